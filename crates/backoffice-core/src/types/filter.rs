//! Filter types for record retrieval and mutation.
//!
//! A [`FilterField`] renders as a REST query parameter (`field=op.value`)
//! for the remote store and can also be evaluated directly against a JSON
//! row for the in-process store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Neq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-insensitive pattern match (`%` wildcards).
    ILike,
    /// `IS` check, used with `Null` or booleans.
    Is,
}

impl FilterOp {
    /// Return the REST operator keyword.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::ILike => "ilike",
            Self::Is => "is",
        }
    }
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value (UUIDs and enum labels included).
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// Null / no value.
    Null,
}

impl FilterValue {
    /// Render the value the way the REST API expects it in a query string.
    pub fn as_query(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }

    /// Convert to a JSON value for comparisons against stored rows.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<uuid::Uuid> for FilterValue {
    fn from(value: uuid::Uuid) -> Self {
        Self::String(value.to_string())
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for a case-insensitive LIKE filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(pattern.into()))
    }

    /// Render as a `(name, value)` REST query pair, e.g. `("leida", "eq.false")`.
    pub fn to_query_pair(&self) -> (String, String) {
        (
            self.field.clone(),
            format!("{}.{}", self.op.as_query(), self.value.as_query()),
        )
    }

    /// Evaluate this condition against a JSON row.
    ///
    /// A missing column compares as `null`.
    pub fn matches(&self, row: &Value) -> bool {
        let actual = row.get(&self.field).unwrap_or(&Value::Null);
        let expected = self.value.to_json();
        match self.op {
            FilterOp::Eq | FilterOp::Is => json_eq(actual, &expected),
            FilterOp::Neq => !json_eq(actual, &expected),
            FilterOp::Gt => json_cmp(actual, &expected) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(
                json_cmp(actual, &expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt => json_cmp(actual, &expected) == Some(Ordering::Less),
            FilterOp::Lte => matches!(
                json_cmp(actual, &expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::ILike => match (actual.as_str(), expected.as_str()) {
                (Some(haystack), Some(pattern)) => ilike(haystack, pattern),
                _ => false,
            },
        }
    }
}

fn json_eq(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => match (actual, expected) {
            // Stored numbers may arrive as strings (numeric columns).
            (Value::String(a), Value::Number(_)) => a.parse::<f64>().ok() == expected.as_f64(),
            _ => actual == expected,
        },
    }
}

fn json_cmp(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

/// Case-insensitive match where `%` stands for any run of characters.
fn ilike(haystack: &str, pattern: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let pattern = pattern.to_lowercase();
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return haystack == pattern;
    }

    let mut rest = haystack.as_str();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(tail) => rest = tail,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}
