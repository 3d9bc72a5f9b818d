//! Core traits defined in `backoffice-core` and implemented by other crates.
//!
//! These are the seams to the managed backend: every remote call the
//! application makes goes through one of them.

pub mod auth;
pub mod change_feed;
pub mod object_storage;
pub mod record;
pub mod record_store;

pub use auth::{AuthGateway, AuthSession};
pub use change_feed::{ChangeFeed, InsertStream};
pub use object_storage::ObjectStorage;
pub use record::Record;
pub use record_store::RecordStore;
