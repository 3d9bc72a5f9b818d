//! Order (pedido) management.

pub mod service;

pub use service::OrderService;
