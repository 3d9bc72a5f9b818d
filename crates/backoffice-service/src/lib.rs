//! # backoffice-service
//!
//! Use cases behind each back-office screen. Services own their
//! repositories and caches; dependencies are handed in at construction
//! through the [`Backend`](backoffice_backend::Backend), the object storage
//! and the change feed.
//!
//! Errors surface as [`AppError`](backoffice_core::error::AppError) and are
//! turned into a [`Notice`] at the call site.

pub mod context;
pub mod dashboard;
pub mod file;
pub mod member;
pub mod notice;
pub mod notification;
pub mod order;
pub mod registry;
pub mod views;

#[cfg(test)]
mod fixtures;

pub use context::{AppContext, UiFlags};
pub use dashboard::{DashboardService, DashboardSummary};
pub use file::FileService;
pub use member::{MemberHistory, MemberService};
pub use notice::{Notice, NoticeLevel};
pub use notification::{Destination, NotificationCenter};
pub use order::OrderService;
pub use registry::AppServices;
