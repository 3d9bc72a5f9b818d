//! Phoenix channel message types and serialization.

pub mod builder;
pub mod envelope;
pub mod serializer;

pub use envelope::PhoenixMessage;
