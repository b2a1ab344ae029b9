//! Projects cleaned rows onto typed employee records

use crate::etl::Transformer;
use crate::publish::TableRow;
use crate::roster::EmployeeRecord;
use crate::sheet::Row;
use eyre::{Context, Result};

/// Transformer from a cleaned [`Row`] to an [`EmployeeRecord`]
///
/// The row must carry exactly the destination columns: a missing column or
/// a column the table does not have is an error. Sheet column order does not
/// matter; the record always follows the table's order.
#[derive(Default)]
pub struct RecordProjector;

impl RecordProjector {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for RecordProjector {
    type Input = Row;
    type Output = EmployeeRecord;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let schema = EmployeeRecord::schema();

        let missing: Vec<&str> = schema
            .column_names()
            .filter(|column| !input.contains(column))
            .collect();
        if !missing.is_empty() {
            eyre::bail!(
                "Row {} is missing column(s): {}",
                input.line(),
                missing.join(", ")
            );
        }

        let unexpected: Vec<&str> = input
            .columns()
            .filter(|column| !schema.column_names().any(|c| c == *column))
            .collect();
        if !unexpected.is_empty() {
            eyre::bail!(
                "Row {} has column(s) that are not in the destination table: {}",
                input.line(),
                unexpected.join(", ")
            );
        }

        EmployeeRecord::try_from(&input)
            .with_context(|| format!("Failed to read employee from row {}", input.line()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::EMPLOYEE_SCHEMA;
    use crate::sheet::Cell;

    fn full_row() -> Row {
        // Deliberately out of table order
        let mut pairs: Vec<(&str, Cell)> = EMPLOYEE_SCHEMA
            .column_names()
            .map(|c| (c, Cell::Empty))
            .collect();
        pairs.reverse();
        pairs[8].1 = Cell::Text("Ann".into());
        Row::from_pairs(3, pairs)
    }

    #[test]
    fn test_projects_in_table_order() {
        let record = RecordProjector::new().transform(full_row()).unwrap();
        assert_eq!(record.name, "Ann");
        assert_eq!(record.values().len(), 9);
    }

    #[test]
    fn test_missing_column() {
        let mut row = full_row();
        row.remove("Benefits");

        let err = RecordProjector::new().transform(row).unwrap_err();
        assert!(err.to_string().contains("Row 3 is missing column(s): Benefits"));
    }

    #[test]
    fn test_unexpected_column() {
        let mut pairs: Vec<(String, Cell)> = Vec::new();
        for column in EMPLOYEE_SCHEMA.column_names() {
            pairs.push((column.to_string(), Cell::Empty));
        }
        pairs.push(("Tax Rate".to_string(), Cell::Float(0.2)));

        let err = RecordProjector::new()
            .transform(Row::new(4, pairs))
            .unwrap_err();
        assert!(err.to_string().contains("not in the destination table: Tax Rate"));
    }
}
