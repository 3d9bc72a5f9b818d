//! Member entity model.

use backoffice_core::AppResult;
use backoffice_core::traits::Record;
use backoffice_core::types::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::wire::non_blank;

/// A customer of the business (`socios` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: MemberId,
    /// Display name, never blank.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Contact phone number.
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    /// When the member was registered.
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Case-insensitive name match or plain phone substring match.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term.to_lowercase())
            || self.phone.as_deref().is_some_and(|p| p.contains(term))
    }
}

impl Record for Member {
    type Id = MemberId;
    type Patch = UpdateMember;

    const TABLE: &'static str = "socios";

    fn id(&self) -> MemberId {
        self.id
    }

    fn apply_patch(&mut self, patch: &UpdateMember) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
    }
}

/// Data required to register a new member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMember {
    /// Display name.
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Contact phone number.
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
}

impl CreateMember {
    /// Build a payload from raw form input.
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            name: name.into(),
            phone,
        }
    }

    /// Trim the input and run client-side validation.
    pub fn prepare(self) -> AppResult<Self> {
        let prepared = Self {
            name: self.name.trim().to_string(),
            phone: non_blank(self.phone),
        };
        prepared.validate()?;
        Ok(prepared)
    }
}

/// Partial update of a member. Unset fields are left untouched on the
/// backend; `phone: Some(None)` clears the phone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMember {
    /// New display name.
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: Option<String>,
    /// New phone number, or `Some(None)` to clear it.
    #[serde(
        rename = "telefono",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
}

impl UpdateMember {
    /// Trim the input and run client-side validation.
    pub fn prepare(self) -> AppResult<Self> {
        let prepared = Self {
            name: self.name.map(|n| n.trim().to_string()),
            phone: self.phone.map(non_blank),
        };
        prepared.validate()?;
        Ok(prepared)
    }

    /// Whether the patch sets any field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}
