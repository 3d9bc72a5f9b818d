//! [`ChangeFeed`](backoffice_core::traits::ChangeFeed) implementations.

pub mod memory;
pub mod phoenix;
