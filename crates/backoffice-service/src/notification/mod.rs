//! Notification center: latest notifications, unread counter, push merge
//! and navigation on open.

pub mod center;
pub mod destination;

pub use center::NotificationCenter;
pub use destination::Destination;
