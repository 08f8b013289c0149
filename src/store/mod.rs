//! Table-addressed row storage.
//!
//! The seeder never owns a schema: it reads and writes JSON rows by table
//! name through [`RowStore`]. Two backends exist: [`RestStore`] talks to the
//! hosted PostgREST endpoint, [`SqliteStore`] keeps rows in a local SQLite
//! file (or in memory for tests).

pub mod query;
pub mod rest;
pub mod sqlite;

pub use query::*;
pub use rest::RestStore;
pub use sqlite::SqliteStore;

use serde_json::{Map, Value};
use thiserror::Error;

/// One stored row, keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot reach store at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    ResponseParsing(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Invalid query on {table}: {reason}")]
    InvalidQuery { table: String, reason: String },
}

/// A referential edge: `child.column` points at `parent.parent_column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    pub child: &'static str,
    pub column: &'static str,
    pub parent: &'static str,
    pub parent_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        child: &'static str,
        column: &'static str,
        parent: &'static str,
        parent_column: &'static str,
    ) -> Self {
        Self {
            child,
            column,
            parent,
            parent_column,
        }
    }
}

/// Row-level CRUD by table name.
///
/// Calls are blocking and independent; there are no transactions spanning
/// calls, so a failed multi-step write leaves the earlier steps in place.
pub trait RowStore {
    /// Rows of `table` matching every filter of `query`.
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert `rows` and return them as stored (with assigned `id`).
    fn insert(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, StoreError>;

    /// Delete rows matching every filter. At least one filter is required.
    fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, StoreError>;
}

/// Read `column` of `row` as text, accepting numbers.
pub fn text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert any serializable record into a [`Row`].
pub fn to_row<T: serde::Serialize>(record: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::ResponseParsing(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Decode a stored row into a typed record.
pub fn from_row<T: serde::de::DeserializeOwned>(row: &Row) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(row.clone()))?)
}

/// Decode every row, failing on the first malformed one.
pub fn from_rows<T: serde::de::DeserializeOwned>(rows: &[Row]) -> Result<Vec<T>, StoreError> {
    rows.iter().map(from_row).collect()
}

/// Convert a slice of records into rows.
pub fn to_rows<T: serde::Serialize>(records: &[T]) -> Result<Vec<Row>, StoreError> {
    records.iter().map(to_row).collect()
}

/// Collect the `id` values of `rows`, skipping rows without one.
pub fn ids_of(rows: &[Row]) -> Vec<Value> {
    rows.iter()
        .filter_map(|r| r.get("id").filter(|v| !v.is_null()).cloned())
        .collect()
}
