//! Record trait shared by every cached entity.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A row of a backend table that can be cached and patched locally.
pub trait Record: Clone + Debug + Send + Sync + DeserializeOwned + 'static {
    /// Identity type.
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;
    /// Partial update payload; serializes to exactly the fields it sets.
    type Patch: Clone + Debug + Serialize + Send + Sync + 'static;

    /// Backend table name.
    const TABLE: &'static str;

    /// This record's identity.
    fn id(&self) -> Self::Id;

    /// Apply the fields set in `patch` to this record.
    fn apply_patch(&mut self, patch: &Self::Patch);
}
