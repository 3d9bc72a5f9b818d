//! # backoffice-backend
//!
//! Access to the managed backend: the HTTP client wiring, the record
//! stores (REST and in-process), the auth gateways and one typed
//! repository per table.

pub mod auth;
pub mod client;
pub mod connection;
pub mod repositories;
pub mod store;

pub use client::BackendClient;
pub use connection::Backend;
pub use store::{MemoryRecordStore, RestRecordStore};
