//! Files attached to a member.

pub mod model;

pub use model::{AttachedFile, CreateAttachedFile};
