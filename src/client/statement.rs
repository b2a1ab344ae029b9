//! SQL statements, bind values and query outcomes

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Snowflake bind type of a positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BindType {
    Text,
    Fixed,
    Real,
    Date,
}

/// A single value bound to a statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Date(NaiveDate),
}

impl BindValue {
    /// Wire form of the value: Snowflake expects every bound value as a string
    ///
    /// Dates are sent as milliseconds since the Unix epoch.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            BindValue::Null => None,
            BindValue::Text(s) => Some(s.clone()),
            BindValue::Integer(i) => Some(i.to_string()),
            BindValue::Real(f) => Some(f.to_string()),
            BindValue::Date(d) => Some(
                d.and_time(NaiveTime::MIN)
                    .and_utc()
                    .timestamp_millis()
                    .to_string(),
            ),
        }
    }
}

impl From<Option<String>> for BindValue {
    fn from(value: Option<String>) -> Self {
        value.map(BindValue::Text).unwrap_or(BindValue::Null)
    }
}

impl From<Option<i64>> for BindValue {
    fn from(value: Option<i64>) -> Self {
        value.map(BindValue::Integer).unwrap_or(BindValue::Null)
    }
}

impl From<Option<f64>> for BindValue {
    fn from(value: Option<f64>) -> Self {
        value.map(BindValue::Real).unwrap_or(BindValue::Null)
    }
}

impl From<Option<NaiveDate>> for BindValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(BindValue::Date).unwrap_or(BindValue::Null)
    }
}

/// Column-wise array binding for one `?` placeholder
///
/// Holding one value per row lets a single `INSERT ... VALUES (?, ...)`
/// insert many rows at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    #[serde(rename = "type")]
    pub kind: BindType,
    #[serde(rename = "value")]
    pub values: Vec<Option<String>>,
}

/// A SQL statement with optional positional (`?`) bindings
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub bindings: Vec<Binding>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    pub fn with_bindings(sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    /// Number of rows the bindings describe (0 when unbound)
    pub fn row_count(&self) -> usize {
        self.bindings.first().map(|b| b.values.len()).unwrap_or(0)
    }

    /// Bindings keyed by 1-based position, as the query endpoint expects
    pub fn wire_bindings(&self) -> Option<BTreeMap<String, &Binding>> {
        if self.bindings.is_empty() {
            return None;
        }
        Some(
            self.bindings
                .iter()
                .enumerate()
                .map(|(i, binding)| ((i + 1).to_string(), binding))
                .collect(),
        )
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sql = self.sql.split_whitespace().collect::<Vec<_>>().join(" ");
        match self.bindings.is_empty() {
            true => write!(f, "{}", sql),
            false => write!(f, "{} [{} row(s) bound]", sql, self.row_count()),
        }
    }
}

/// Result of a completed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub query_id: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryOutcome {
    /// First column of the first row, if any
    pub fn scalar(&self) -> Option<&str> {
        self.rows.first()?.first()?.as_deref()
    }

    /// Rows reported by DML statements (`number of rows inserted`, etc.)
    pub fn rows_affected(&self) -> Option<u64> {
        let column = self.columns.first()?;
        if !column.to_lowercase().starts_with("number of rows") {
            return None;
        }
        self.scalar()?.parse().ok()
    }
}

/// A statement rejected by the warehouse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct QueryError {
    pub code: String,
    pub message: String,
    pub sql_state: Option<String>,
    pub query_id: Option<String>,
}

impl QueryError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            sql_state: None,
            query_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_values() {
        assert_eq!(BindValue::Null.to_wire(), None);
        assert_eq!(BindValue::Integer(4).to_wire().as_deref(), Some("4"));
        assert_eq!(BindValue::Real(55000.0).to_wire().as_deref(), Some("55000"));
        assert_eq!(BindValue::Real(0.25).to_wire().as_deref(), Some("0.25"));
        let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        assert_eq!(
            BindValue::Date(date).to_wire().as_deref(),
            Some("1579046400000")
        );
    }

    #[test]
    fn test_wire_bindings_are_one_based() {
        let statement = Statement::with_bindings(
            "INSERT INTO t VALUES (?, ?)",
            vec![
                Binding {
                    kind: BindType::Text,
                    values: vec![Some("a".into()), None],
                },
                Binding {
                    kind: BindType::Fixed,
                    values: vec![Some("1".into()), Some("2".into())],
                },
            ],
        );

        assert_eq!(statement.row_count(), 2);
        let wire = serde_json::to_value(statement.wire_bindings()).unwrap();
        assert_eq!(
            wire,
            json!({
                "1": {"type": "TEXT", "value": ["a", null]},
                "2": {"type": "FIXED", "value": ["1", "2"]}
            })
        );
    }

    #[test]
    fn test_unbound_statement() {
        let statement = Statement::new("SELECT 1");
        assert!(statement.wire_bindings().is_none());
        assert_eq!(statement.row_count(), 0);
        assert_eq!(statement.to_string(), "SELECT 1");
    }

    #[test]
    fn test_rows_affected() {
        let outcome = QueryOutcome {
            query_id: None,
            columns: vec!["number of rows inserted".into()],
            rows: vec![vec![Some("3".into())]],
        };
        assert_eq!(outcome.rows_affected(), Some(3));

        let outcome = QueryOutcome {
            query_id: None,
            columns: vec!["CURRENT_VERSION()".into()],
            rows: vec![vec![Some("8.1.0".into())]],
        };
        assert_eq!(outcome.rows_affected(), None);
        assert_eq!(outcome.scalar(), Some("8.1.0"));
    }
}
