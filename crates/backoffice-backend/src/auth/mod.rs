//! [`AuthGateway`](backoffice_core::traits::AuthGateway) implementations.

pub mod memory;
pub mod remote;

pub use memory::MemoryAuthGateway;
pub use remote::RemoteAuthGateway;
