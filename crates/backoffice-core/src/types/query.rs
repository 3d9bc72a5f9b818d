//! Record retrieval query description.

use serde::{Deserialize, Serialize};

use super::filter::FilterField;
use super::sorting::SortField;

/// A to-one relation to expand inline, e.g. an order's member.
///
/// Renders in the REST select list as `alias:table(*)`; the in-process
/// store joins `foreign_key` against the target table's `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expand {
    /// Key the related row is placed under.
    pub alias: String,
    /// Related table.
    pub table: String,
    /// Column on the base row referencing the related row's `id`.
    pub foreign_key: String,
}

impl Expand {
    /// Create a new relation expansion.
    pub fn new(
        alias: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            table: table.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// Fetch-all query: equality filters, one ordering, relation expansion and
/// an optional row limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// Conditions every returned row satisfies.
    pub filters: Vec<FilterField>,
    /// Ordering of the result.
    pub order: Option<SortField>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
    /// Relations to expand inline.
    pub expand: Vec<Expand>,
}

impl SelectQuery {
    /// A query returning every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering.
    pub fn order_by(mut self, order: SortField) -> Self {
        self.order = Some(order);
        self
    }

    /// Limit the number of rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Expand a relation.
    pub fn expand(mut self, expand: Expand) -> Self {
        self.expand.push(expand);
        self
    }

    /// The REST `select=` value, e.g. `*,socio:socios(*)`.
    pub fn select_clause(&self) -> String {
        let mut clause = String::from("*");
        for e in &self.expand {
            clause.push_str(&format!(",{}:{}(*)", e.alias, e.table));
        }
        clause
    }
}
