//! Sign-in configuration for the binaries.

use serde::{Deserialize, Serialize};

/// Credentials the binaries use to open a session.
///
/// Both fields are optional; the CLI prompts for whatever is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}
