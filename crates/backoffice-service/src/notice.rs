//! Transient user-visible notices.
//!
//! Every fallible call site turns its outcome into a [`Notice`]. Failures
//! are logged here and not propagated further.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use backoffice_core::AppError;
use backoffice_core::error::ErrorKind;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Log `err` and build the notice shown for it.
    ///
    /// Validation failures show their own message; anything else shows
    /// `fallback`.
    pub fn from_error(fallback: &str, err: &AppError) -> Self {
        warn!(kind = %err.kind, error = %err, "{fallback}");
        match err.kind {
            ErrorKind::Validation => Self::error(err.message.clone()),
            _ => Self::error(fallback),
        }
    }

    /// Settle a result into its value (on success) and a notice.
    pub fn settle<T>(
        result: Result<T, AppError>,
        success: &str,
        failure: &str,
    ) -> (Option<T>, Notice) {
        match result {
            Ok(value) => {
                info!("{success}");
                (Some(value), Self::success(success))
            }
            Err(e) => (None, Self::from_error(failure, &e)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_its_message() {
        let err = AppError::validation("member: select a member");
        let notice = Notice::from_error("Error al crear pedido", &err);
        assert!(notice.is_error());
        assert_eq!(notice.message, "member: select a member");
    }

    #[test]
    fn test_other_errors_use_fallback() {
        let err = AppError::mutation("HTTP 500: boom");
        let notice = Notice::from_error("Error al actualizar estado", &err);
        assert_eq!(notice.message, "Error al actualizar estado");
    }

    #[test]
    fn test_settle() {
        let (value, notice) = Notice::settle(Ok(3), "Pedido creado", "Error al crear pedido");
        assert_eq!(value, Some(3));
        assert_eq!(notice, Notice::success("Pedido creado"));

        let (value, notice) = Notice::settle::<()>(
            Err(AppError::fetch("down")),
            "ok",
            "Error al cargar datos",
        );
        assert!(value.is_none());
        assert_eq!(notice.to_string(), "[error] Error al cargar datos");
    }
}
