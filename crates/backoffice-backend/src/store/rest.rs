//! PostgREST-backed record store.

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::RecordStore;
use backoffice_core::types::{FilterField, SelectQuery};

use crate::client::BackendClient;

/// Record store talking to the backend's REST API.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    client: BackendClient,
}

impl RestRecordStore {
    /// Create a new REST record store.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        self.client
            .endpoint(&self.client.config().rest_url(), table)
    }

    /// Append `select`, `order`, `limit` and filter parameters.
    fn select_url(&self, table: &str, query: &SelectQuery) -> AppResult<Url> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &query.select_clause());
            for filter in &query.filters {
                let (name, value) = filter.to_query_pair();
                pairs.append_pair(&name, &value);
            }
            if let Some(order) = &query.order {
                pairs.append_pair("order", &order.to_query());
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }

    fn filtered_url(&self, table: &str, filters: &[FilterField]) -> AppResult<Url> {
        if filters.is_empty() {
            return Err(AppError::mutation(format!(
                "Refusing to modify every row of '{table}' without a filter"
            )));
        }
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            for filter in filters {
                let (name, value) = filter.to_query_pair();
                pairs.append_pair(&name, &value);
            }
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        kind: ErrorKind,
    ) -> AppResult<Value> {
        let mut request = self.client.request(method, url).await;
        if kind == ErrorKind::Mutation {
            request = request.header("Prefer", "return=representation");
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = self.client.send(request, kind).await?;
        BackendClient::handle_response(response, kind).await
    }
}

fn into_rows(value: Value, kind: ErrorKind) -> AppResult<Vec<Value>> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(AppError::new(
            kind,
            format!("Expected a JSON array from the backend, got: {other}"),
        )),
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> AppResult<Vec<Value>> {
        let url = self.select_url(table, query)?;
        let body = self
            .execute(Method::GET, url, None, ErrorKind::Fetch)
            .await
            .map_err(|e| {
                warn!(table, error = %e, "Select failed");
                e
            })?;
        let rows = into_rows(body, ErrorKind::Fetch)?;
        debug!(table, count = rows.len(), "Rows fetched");
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        let url = self.table_url(table)?;
        let body = self
            .execute(Method::POST, url, Some(row), ErrorKind::Mutation)
            .await?;
        into_rows(body, ErrorKind::Mutation)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::mutation(format!("Insert into '{table}' returned no row")))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[FilterField],
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        let url = self.filtered_url(table, filters)?;
        let body = self
            .execute(Method::PATCH, url, Some(patch), ErrorKind::Mutation)
            .await?;
        into_rows(body, ErrorKind::Mutation)
    }

    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        let url = self.filtered_url(table, filters)?;
        let body = self
            .execute(Method::DELETE, url, None, ErrorKind::Mutation)
            .await?;
        Ok(into_rows(body, ErrorKind::Mutation)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::config::BackendConfig;
    use backoffice_core::types::{Expand, SortField};

    fn store() -> RestRecordStore {
        let client = BackendClient::new(&BackendConfig {
            url: "https://abc.supabase.co".into(),
            anon_key: "anon".into(),
            ..Default::default()
        })
        .unwrap();
        RestRecordStore::new(client)
    }

    #[test]
    fn test_select_url() {
        let query = SelectQuery::all()
            .order_by(SortField::desc("created_at"))
            .expand(Expand::new("socio", "socios", "socio_id"))
            .limit(20);
        let url = store().select_url("pedidos", &query).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.path(), "/rest/v1/pedidos");
        assert!(pairs.contains(&("select".into(), "*,socio:socios(*)".into())));
        assert!(pairs.contains(&("order".into(), "created_at.desc".into())));
        assert!(pairs.contains(&("limit".into(), "20".into())));
    }

    #[test]
    fn test_filtered_url() {
        let url = store()
            .filtered_url("notifications", &[FilterField::eq("leida", false)])
            .unwrap();
        assert_eq!(url.query(), Some("leida=eq.false"));
    }

    #[test]
    fn test_unfiltered_mutation_refused() {
        let err = store().filtered_url("socios", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Mutation);
    }

    #[test]
    fn test_into_rows() {
        assert!(into_rows(Value::Null, ErrorKind::Fetch).unwrap().is_empty());
        assert!(into_rows(serde_json::json!({"a": 1}), ErrorKind::Fetch).is_err());
    }
}
