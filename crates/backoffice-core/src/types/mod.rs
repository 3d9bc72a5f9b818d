//! Core type definitions used across the back-office workspace.

pub mod filter;
pub mod id;
pub mod query;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use query::{Expand, SelectQuery};
pub use sorting::{SortDirection, SortField};
