//! Object storage trait for member attachments.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Binary object storage keyed by path within one bucket.
///
/// Failures are reported as `Upload` errors.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "remote", "local").
    fn provider_type(&self) -> &str;

    /// Store `data` at `path`.
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Public URL for an object path. Does not check existence.
    fn public_url(&self, path: &str) -> String;

    /// Recover the object path from a public URL produced by [`public_url`].
    ///
    /// [`public_url`]: ObjectStorage::public_url
    fn path_from_url(&self, url: &str) -> Option<String>;

    /// Delete the objects at `paths`. Missing objects are not an error.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;
}
