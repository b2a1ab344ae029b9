//! Destination table shape and SQL generation

use crate::client::{BindType, BindValue, Binding, Statement};
use crate::publish::WritePolicy;

/// Logical column type of a destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Date,
    Integer,
    Numeric,
}

impl ColumnType {
    /// Snowflake DDL type
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text => "STRING",
            Self::Date => "DATE",
            Self::Integer => "INT",
            Self::Numeric => "NUMBER",
        }
    }

    /// Bind type used when inserting values of this column
    pub fn bind_type(&self) -> BindType {
        match self {
            Self::Text => BindType::Text,
            Self::Date => BindType::Date,
            Self::Integer => BindType::Fixed,
            Self::Numeric => BindType::Real,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Date => write!(f, "date"),
            Self::Integer => write!(f, "integer"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

/// Ordered column list of a destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: &'static [Column],
}

impl TableSchema {
    pub const fn new(columns: &'static [Column]) -> Self {
        Self { columns }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|c| c.name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `CREATE ... TABLE` statement for this schema under `policy`
    pub fn create_statement(&self, table: &str, policy: WritePolicy) -> Statement {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("    {} {}", quote_identifier(c.name), c.kind.sql_type()))
            .collect::<Vec<_>>()
            .join(",\n");
        Statement::new(format!(
            "{} {} (\n{}\n)",
            policy.create_clause(),
            quote_identifier(table),
            columns
        ))
    }

    /// Parameterized multi-row `INSERT` for `rows`, bound column by column
    pub fn insert_statement<R: TableRow>(&self, table: &str, rows: &[R]) -> Statement {
        let names = self
            .column_names()
            .map(quote_identifier)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; self.len()].join(", ");

        let mut bindings: Vec<Binding> = self
            .columns
            .iter()
            .map(|c| Binding {
                kind: c.kind.bind_type(),
                values: Vec::with_capacity(rows.len()),
            })
            .collect();
        for row in rows {
            for (binding, value) in bindings.iter_mut().zip(row.values()) {
                binding.values.push(value.to_wire());
            }
        }

        Statement::with_bindings(
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_identifier(table),
                names,
                placeholders
            ),
            bindings,
        )
    }
}

/// A record that can be written as one row of a [`TableSchema`]
pub trait TableRow: Send + Sync {
    /// The table shape this record fills
    fn schema() -> TableSchema;

    /// Values in schema column order
    fn values(&self) -> Vec<BindValue>;
}

/// Double-quote an identifier, escaping embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
