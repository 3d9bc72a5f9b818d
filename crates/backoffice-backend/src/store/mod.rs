//! [`RecordStore`](backoffice_core::traits::RecordStore) implementations.

pub mod memory;
pub mod rest;

pub use memory::{InsertEvent, MemoryRecordStore};
pub use rest::RestRecordStore;
