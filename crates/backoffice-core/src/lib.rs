//! # backoffice-core
//!
//! Core crate for the back-office. Contains the backend traits (records,
//! object storage, change feed, auth), configuration schemas, typed
//! identifiers, query types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other back-office crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
