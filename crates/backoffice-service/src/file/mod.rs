//! Files attached to members.

pub mod service;

pub use service::FileService;
