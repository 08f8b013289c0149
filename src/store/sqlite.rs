use std::path::Path;

use rusqlite::{params, Connection};
use serde_json::Value;

use super::query::{compare_values, values_equal, Direction, RowMatcher};
use super::{Filter, ForeignKey, Query, Row, RowStore, StoreError};

/// Local row store: every record is a JSON document in `store_rows`.
///
/// Used for offline runs and as the store double in tests. Foreign keys
/// registered with [`SqliteStore::with_constraints`] are checked the way the
/// hosted database checks them: inserts need an existing parent, deletes of
/// a still-referenced parent are refused.
pub struct SqliteStore {
    conn: Connection,
    constraints: Vec<ForeignKey>,
}

impl SqliteStore {
    /// Open (or create) a store file and run migrations
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connection(format!("{}: {e}", parent.display()))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn,
            constraints: Vec::new(),
        })
    }

    /// Enforce these foreign keys on subsequent writes.
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = ForeignKey>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Number of rows currently stored for `table`.
    pub fn count(&self, table: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM store_rows WHERE table_name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    fn load(&self, table: &str) -> Result<Vec<(i64, Row)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, data FROM store_rows WHERE table_name = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, data) = row?;
            let parsed: Row = serde_json::from_str(&data)?;
            out.push((key, parsed));
        }
        Ok(out)
    }

    fn check_parents_exist(&self, table: &str, rows: &[Row]) -> Result<(), StoreError> {
        for fk in self.constraints.iter().filter(|fk| fk.child == table) {
            let parents = self.load(fk.parent)?;
            for row in rows {
                let value = match row.get(fk.column) {
                    None | Some(Value::Null) => continue,
                    Some(v) => v,
                };
                let found = parents
                    .iter()
                    .any(|(_, p)| p.get(fk.parent_column).is_some_and(|pv| values_equal(pv, value)));
                if !found {
                    return Err(StoreError::ConstraintViolation(format!(
                        "{}.{} = {value} has no matching {}.{}",
                        fk.child, fk.column, fk.parent, fk.parent_column
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_no_children(&self, table: &str, doomed: &[&Row]) -> Result<(), StoreError> {
        for fk in self.constraints.iter().filter(|fk| fk.parent == table) {
            let keys: Vec<&Value> = doomed
                .iter()
                .filter_map(|r| r.get(fk.parent_column))
                .filter(|v| !v.is_null())
                .collect();
            if keys.is_empty() {
                continue;
            }
            let referencing = self
                .load(fk.child)?
                .into_iter()
                .filter(|(_, child)| {
                    child
                        .get(fk.column)
                        .is_some_and(|cv| keys.iter().any(|k| values_equal(cv, k)))
                })
                .count();
            if referencing > 0 {
                return Err(StoreError::ConstraintViolation(format!(
                    "{referencing} row(s) in {} still reference {} via {}",
                    fk.child, fk.parent, fk.column
                )));
            }
        }
        Ok(())
    }
}

impl RowStore for SqliteStore {
    fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let matcher = RowMatcher::new(&query.filters)?;
        let mut rows: Vec<Row> = self
            .load(table)?
            .into_iter()
            .map(|(_, row)| row)
            .filter(|row| matcher.matches(row))
            .collect();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows.into_iter().map(|r| query.project(r)).collect())
    }

    fn insert(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.check_parents_exist(table, rows)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row = row.clone();
            tx.execute(
                "INSERT INTO store_rows (table_name, data) VALUES (?1, ?2)",
                params![table, serde_json::to_string(&row)?],
            )?;
            if row.get("id").map_or(true, Value::is_null) {
                let key = tx.last_insert_rowid();
                row.insert("id".into(), Value::from(key));
                tx.execute(
                    "UPDATE store_rows SET data = ?1 WHERE id = ?2",
                    params![serde_json::to_string(&row)?, key],
                )?;
            }
            stored.push(row);
        }
        tx.commit()?;

        tracing::debug!(table, count = stored.len(), "Inserted local rows");
        Ok(stored)
    }

    fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::InvalidQuery {
                table: table.to_string(),
                reason: "delete requires at least one filter".into(),
            });
        }
        let matcher = RowMatcher::new(filters)?;
        let all = self.load(table)?;
        let doomed: Vec<&(i64, Row)> = all.iter().filter(|(_, row)| matcher.matches(row)).collect();
        if doomed.is_empty() {
            return Ok(0);
        }
        let doomed_rows: Vec<&Row> = doomed.iter().map(|(_, r)| r).collect();
        self.check_no_children(table, &doomed_rows)?;

        let tx = self.conn.unchecked_transaction()?;
        for (key, _) in &doomed {
            tx.execute("DELETE FROM store_rows WHERE id = ?1", params![key])?;
        }
        tx.commit()?;

        tracing::debug!(table, count = doomed.len(), "Deleted local rows");
        Ok(doomed.len())
    }
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_row_store.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| StoreError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}
