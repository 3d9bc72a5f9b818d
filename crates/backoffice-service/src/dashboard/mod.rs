//! Dashboard metrics.

pub mod service;

pub use service::{DashboardService, DashboardSummary};
