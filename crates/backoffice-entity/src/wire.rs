//! Serde helpers for backend column formats.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional date column that may hold either a plain date
/// (`2024-05-01`) or a full timestamp (`2024-05-01T10:00:00+00:00`).
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => {
            let day = s.get(..10).unwrap_or(&s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_date")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn test_lenient_date_accepts_timestamp() {
        let row: Row = serde_json::from_str(r#"{"day":"2024-05-01T10:00:00+00:00"}"#).unwrap();
        assert_eq!(row.day, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_lenient_date_null_and_missing() {
        let row: Row = serde_json::from_str(r#"{"day":null}"#).unwrap();
        assert!(row.day.is_none());
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.day.is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" 11 ".into())), Some("11".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
