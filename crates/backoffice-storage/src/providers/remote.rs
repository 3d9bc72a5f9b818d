//! Object storage over the backend's bucket API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::{debug, info};

use backoffice_backend::BackendClient;
use backoffice_core::error::ErrorKind;
use backoffice_core::result::AppResult;
use backoffice_core::traits::ObjectStorage;

use crate::path::validate;

/// One bucket of the backend's object storage.
#[derive(Debug, Clone)]
pub struct RemoteObjectStorage {
    client: BackendClient,
    bucket: String,
}

impl RemoteObjectStorage {
    /// Create a provider for `bucket`.
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn public_prefix(&self) -> String {
        format!(
            "{}/object/public/{}/",
            self.client.config().storage_url(),
            self.bucket
        )
    }
}

#[async_trait]
impl ObjectStorage for RemoteObjectStorage {
    fn provider_type(&self) -> &str {
        "remote"
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let path = validate(path)?;
        let url = self.client.endpoint(
            &self.client.config().storage_url(),
            &format!("object/{}/{path}", self.bucket),
        )?;
        let size = data.len();
        let request = self
            .client
            .request(Method::POST, url)
            .await
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data);
        let response = self.client.send(request, ErrorKind::Upload).await?;
        BackendClient::handle_response(response, ErrorKind::Upload).await?;
        info!(bucket = %self.bucket, path, bytes = size, "Object uploaded");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), path.trim_start_matches('/'))
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix())
            .map(|rest| rest.split(['?', '#']).next().unwrap_or(rest).to_string())
            .filter(|p| !p.is_empty())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.client.endpoint(
            &self.client.config().storage_url(),
            &format!("object/{}", self.bucket),
        )?;
        let request = self
            .client
            .request(Method::DELETE, url)
            .await
            .json(&json!({ "prefixes": paths }));
        let response = self.client.send(request, ErrorKind::Upload).await?;
        BackendClient::handle_response(response, ErrorKind::Upload).await?;
        debug!(bucket = %self.bucket, count = paths.len(), "Objects removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::config::BackendConfig;

    fn storage() -> RemoteObjectStorage {
        let client = BackendClient::new(&BackendConfig {
            url: "https://abc.supabase.co".into(),
            anon_key: "anon".into(),
            ..Default::default()
        })
        .unwrap();
        RemoteObjectStorage::new(client, "socio-files")
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            storage().public_url("m1/x.pdf"),
            "https://abc.supabase.co/storage/v1/object/public/socio-files/m1/x.pdf"
        );
    }

    #[test]
    fn test_path_from_url() {
        let storage = storage();
        let url = storage.public_url("m1/x.pdf");
        assert_eq!(storage.path_from_url(&url).as_deref(), Some("m1/x.pdf"));
        assert_eq!(
            storage
                .path_from_url(&format!("{url}?download=1"))
                .as_deref(),
            Some("m1/x.pdf")
        );
        assert_eq!(storage.path_from_url("https://other/x.pdf"), None);
    }
}
