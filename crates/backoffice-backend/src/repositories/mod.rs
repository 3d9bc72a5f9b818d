//! Typed repositories, one per backend table.

pub mod attachment;
pub mod member;
pub mod notification;
pub mod order;

pub use attachment::AttachmentRepository;
pub use member::MemberRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;

use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;

/// Decode every row, failing on the first malformed one.
pub(crate) fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> AppResult<Vec<T>> {
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

/// Decode one row.
pub(crate) fn decode_row<T: DeserializeOwned>(table: &str, row: Value) -> AppResult<T> {
    serde_json::from_value(row).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed '{table}' row: {e}"),
            e,
        )
    })
}

/// Take the single row an update-by-id returned.
pub(crate) fn single<T: DeserializeOwned>(
    table: &str,
    id: impl std::fmt::Display,
    rows: Vec<Value>,
) -> AppResult<T> {
    match rows.into_iter().next() {
        Some(row) => decode_row(table, row),
        None => Err(AppError::not_found(format!("No row '{id}' in '{table}'"))),
    }
}
