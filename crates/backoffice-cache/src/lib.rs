//! # backoffice-cache
//!
//! Client-side cache of one backend table for the active view.
//!
//! A [`CachedCollection`] is loaded in full from a [`CollectionSource`],
//! accepts optimistic field edits that show up locally before the backend
//! confirms them, reloads everything when a confirmation fails, and
//! prepends rows pushed by a change feed while a [`LiveSubscription`] is
//! held.
//!
//! Consistency is deliberately weak: commits may resolve in any order, the
//! backend keeps whichever landed last, and a pushed insert may shadow an
//! in-flight optimistic edit until the next load.

pub mod collection;
pub mod source;
pub mod subscription;

pub use collection::{CachedCollection, PendingUpdate};
pub use source::{CollectionSource, StoreSource};
pub use subscription::LiveSubscription;
