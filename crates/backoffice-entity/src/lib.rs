//! # backoffice-entity
//!
//! Domain entity models for the back-office. Every struct in this crate
//! represents a backend table row or a payload sent to one. Wire names are
//! the Spanish column names of the backend tables; Rust field names are
//! English and mapped with serde renames.

pub mod attachment;
pub mod member;
pub mod notification;
pub mod order;
pub mod wire;
