//! Attached file entity model.

use backoffice_core::types::{FileId, MemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of a file uploaded for a member (`socio_archivos` table).
/// The bytes live in object storage under `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    /// Unique file identifier.
    pub id: FileId,
    /// Owning member.
    #[serde(rename = "socio_id")]
    pub member_id: MemberId,
    /// Original filename.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Public storage URL.
    pub url: String,
    /// MIME type.
    #[serde(rename = "tipo")]
    pub mime_type: String,
    /// Size in bytes.
    #[serde(rename = "peso", default)]
    pub size: u64,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl AttachedFile {
    /// Whether the file can be previewed as an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Metadata row written after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttachedFile {
    #[serde(rename = "socio_id")]
    pub member_id: MemberId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub url: String,
    #[serde(rename = "tipo")]
    pub mime_type: String,
    #[serde(rename = "peso")]
    pub size: u64,
}
