//! Object storage provider implementations.

pub mod local;
pub mod remote;

pub use local::LocalObjectStorage;
pub use remote::RemoteObjectStorage;
