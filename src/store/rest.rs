use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::query::Direction;
use super::{Filter, Query, Row, RowStore, StoreError};

/// Rows fetched per request when a select has no explicit limit.
const PAGE_SIZE: usize = 1000;

/// Primary key every hosted table carries; the tie-breaker for paged reads.
const KEY_COLUMN: &str = "id";

/// PostgREST client for the hosted database (Supabase `/rest/v1`).
pub struct RestStore {
    base_url: String,
    service_key: String,
    client: Client,
    timeout_secs: u64,
}

impl RestStore {
    /// Create a client for `base_url` authenticated with a service-role key.
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            client,
            timeout_secs,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().map_err(|e| {
            if e.is_connect() {
                StoreError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                StoreError::Http(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                StoreError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn rows_from(&self, response: Response) -> Result<Vec<Row>, StoreError> {
        let parsed: Vec<Value> = response
            .json()
            .map_err(|e| StoreError::ResponseParsing(e.to_string()))?;
        parsed
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => Ok(map),
                other => Err(StoreError::ResponseParsing(format!(
                    "expected row object, got {other}"
                ))),
            })
            .collect()
    }

    fn fetch(&self, table: &str, params: &[(String, String)]) -> Result<Vec<Row>, StoreError> {
        let request = self.authorized(self.client.get(self.table_url(table)).query(params));
        let response = self.send(request)?;
        self.rows_from(response)
    }
}

impl RowStore for RestStore {
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        if let Some(limit) = query.limit {
            let mut params = select_params(query);
            params.push(("limit".into(), limit.to_string()));
            return self.fetch(table, &params);
        }

        // The server may cap a page below PAGE_SIZE, so only an empty page ends the read.
        let mut rows = Vec::new();
        loop {
            let page = self.fetch(table, &page_params(query, rows.len()))?;
            if page.is_empty() {
                break;
            }
            rows.extend(page);
        }
        tracing::debug!(table, count = rows.len(), "Fetched remote rows");
        Ok(rows)
    }

    fn insert(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(rows);
        let response = self.send(request)?;
        let stored = self.rows_from(response)?;
        tracing::debug!(table, count = stored.len(), "Inserted remote rows");
        Ok(stored)
    }

    fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::InvalidQuery {
                table: table.to_string(),
                reason: "delete requires at least one filter".into(),
            });
        }
        let params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let request = self
            .authorized(self.client.delete(self.table_url(table)).query(&params))
            .header("Prefer", "return=representation");
        let response = self.send(request)?;
        let removed = self.rows_from(response)?.len();
        tracing::debug!(table, count = removed, "Deleted remote rows");
        Ok(removed)
    }
}

/// Query-string pairs for a select, without paging.
pub fn select_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.select_clause())];
    params.extend(query.filters.iter().map(filter_param));
    if let Some((column, direction)) = &query.order {
        params.push(("order".into(), format!("{column}.{}", direction_param(*direction))));
    }
    params
}

/// Query-string pairs for one page of an unlimited select.
///
/// Pages are ordered with `id` as the final key so consecutive offsets
/// neither repeat nor skip rows.
pub fn page_params(query: &Query, offset: usize) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = select_params(query)
        .into_iter()
        .filter(|(key, _)| key != "order")
        .collect();
    let order = match &query.order {
        None => format!("{KEY_COLUMN}.asc"),
        Some((column, direction)) => {
            let dir = direction_param(*direction);
            if column == KEY_COLUMN {
                format!("{column}.{dir}")
            } else {
                format!("{column}.{dir},{KEY_COLUMN}.asc")
            }
        }
    };
    params.push(("order".into(), order));
    params.push(("limit".into(), PAGE_SIZE.to_string()));
    params.push(("offset".into(), offset.to_string()));
    params
}

fn direction_param(direction: Direction) -> &'static str {
    match direction {
        Direction::Asc => "asc",
        Direction::Desc => "desc",
    }
}

/// Render one filter in PostgREST operator syntax.
pub fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(column, value) => (column.clone(), format!("eq.{}", scalar(value))),
        Filter::In(column, values) => {
            let list: Vec<String> = values.iter().map(quoted).collect();
            (column.clone(), format!("in.({})", list.join(",")))
        }
        Filter::ILike(column, pattern) => (column.clone(), format!("ilike.{pattern}")),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".into(),
        other => other.to_string(),
    }
}

/// List members are double-quoted when they could break the `in.(..)` syntax.
fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains([',', '(', ')', '"', ' ']) => {
            format!("\"{}\"", s.replace('"', "\\\""))
        }
        other => scalar(other),
    }
}
