use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use super::{Row, StoreError};

/// A single column predicate. All filters of a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
    /// Case-insensitive pattern: `%` matches any run, `_` one character.
    ILike(String, String),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::Eq(column.to_string(), value.into())
    }

    pub fn is_in(column: &str, values: Vec<Value>) -> Self {
        Self::In(column.to_string(), values)
    }

    pub fn ilike(column: &str, pattern: &str) -> Self {
        Self::ILike(column.to_string(), pattern.to_string())
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Eq(c, _) | Self::In(c, _) | Self::ILike(c, _) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Select parameters: projection, filters, ordering and limit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub columns: Option<Vec<String>>,
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    /// Every column of every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Project to a comma-separated column list; `*` keeps every column.
    pub fn columns(mut self, list: &str) -> Self {
        let cols: Vec<String> = list
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.columns = if cols.iter().any(|c| c == "*") || cols.is_empty() {
            None
        } else {
            Some(cols)
        };
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Comma-joined projection as sent over the wire.
    pub fn select_clause(&self) -> String {
        match &self.columns {
            Some(cols) => cols.join(","),
            None => "*".to_string(),
        }
    }

    /// Keep only the projected columns of `row`.
    pub fn project(&self, row: Row) -> Row {
        match &self.columns {
            None => row,
            Some(cols) => row
                .into_iter()
                .filter(|(k, _)| cols.iter().any(|c| c == k))
                .collect(),
        }
    }
}

/// Filters compiled once and applied to many rows.
pub struct RowMatcher {
    filters: Vec<(Filter, Option<Regex>)>,
}

impl RowMatcher {
    pub fn new(filters: &[Filter]) -> Result<Self, StoreError> {
        let mut compiled = Vec::with_capacity(filters.len());
        for f in filters {
            let re = match f {
                Filter::ILike(column, pattern) => Some(like_regex(pattern).map_err(|e| {
                    StoreError::InvalidQuery {
                        table: column.clone(),
                        reason: e.to_string(),
                    }
                })?),
                _ => None,
            };
            compiled.push((f.clone(), re));
        }
        Ok(Self { filters: compiled })
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|(filter, re)| {
            let cell = row.get(filter.column()).unwrap_or(&Value::Null);
            match filter {
                Filter::Eq(_, v) => values_equal(cell, v),
                Filter::In(_, vs) => vs.iter().any(|v| values_equal(cell, v)),
                Filter::ILike(_, _) => match (value_text(cell), re) {
                    (Some(text), Some(re)) => re.is_match(&text),
                    _ => false,
                },
            }
        })
    }
}

/// Translate a SQL LIKE pattern into an anchored case-insensitive regex.
pub fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut out = String::from("(?is)^");
    for ch in pattern.chars() {
        match ch {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out)
}

/// Equality that tolerates numbers stored as strings and vice versa.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.to_string() == *s
        }
        _ => a == b,
    }
}

/// Ordering used for `order=` on local rows. Nulls sort first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => value_text(a).cmp(&value_text(b)),
    }
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn like_pattern_matches_prefix() {
        let re = like_regex("OPD-20250110-%").unwrap();
        assert!(re.is_match("OPD-20250110-0001"));
        assert!(re.is_match("opd-20250110-0042"));
        assert!(!re.is_match("OPD-20250111-0001"));
    }

    #[test]
    fn like_escapes_regex_metacharacters() {
        let re = like_regex("a.b%").unwrap();
        assert!(re.is_match("a.bc"));
        assert!(!re.is_match("axbc"));
    }

    #[test]
    fn underscore_matches_single_char() {
        let re = like_regex("G-_").unwrap();
        assert!(re.is_match("G-1"));
        assert!(!re.is_match("G-12"));
    }

    #[test]
    fn eq_tolerates_numeric_strings() {
        assert!(values_equal(&json!(5), &json!("5")));
        assert!(values_equal(&json!("abc"), &json!("abc")));
        assert!(!values_equal(&json!(null), &json!(null)));
        assert!(values_equal(&json!(2), &json!(2.0)));
    }

    #[test]
    fn matcher_ands_filters() {
        let m = RowMatcher::new(&[
            Filter::eq("ipd_no", "IPD-1"),
            Filter::is_in("status", vec![json!("pending"), json!("completed")]),
        ])
        .unwrap();
        assert!(m.matches(&row(json!({"ipd_no": "IPD-1", "status": "pending"}))));
        assert!(!m.matches(&row(json!({"ipd_no": "IPD-1", "status": "cancelled"}))));
        assert!(!m.matches(&row(json!({"ipd_no": "IPD-2", "status": "pending"}))));
    }

    #[test]
    fn ilike_never_matches_null() {
        let m = RowMatcher::new(&[Filter::ilike("opd_no", "%")]).unwrap();
        assert!(!m.matches(&row(json!({"opd_no": null}))));
        assert!(m.matches(&row(json!({"opd_no": ""}))));
    }

    #[test]
    fn columns_parse_projection() {
        let q = Query::all().columns("id, start_date");
        assert_eq!(q.select_clause(), "id,start_date");
        let projected = q.project(row(json!({"id": 1, "start_date": "x", "other": 2})));
        assert_eq!(projected.len(), 2);
        assert!(Query::all().columns("*").columns.is_none());
    }

    #[test]
    fn compare_orders_dates_as_text() {
        let a = json!("2025-01-02");
        let b = json!("2025-01-10");
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Less);
        assert_eq!(compare_values(None, Some(&b)), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(10)), Some(&json!(9))), Ordering::Greater);
    }
}
