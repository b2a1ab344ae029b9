//! Column dropper transformer
//!
//! Removes columns that are derived in the source sheet and are not part of
//! the published table.

use crate::etl::Transformer;
use crate::roster::DROPPED_COLUMNS;
use crate::sheet::Row;
use eyre::Result;

/// Transformer that drops named columns from rows
///
/// Every named column must be present; a missing one means the sheet is not
/// the one we expect, so it is an error rather than a no-op.
///
/// # Example
/// ```
/// use roster_publisher::transform::ColumnDropper;
/// use roster_publisher::etl::Transformer;
/// use roster_publisher::sheet::{Cell, Row};
///
/// let dropper = ColumnDropper::new(vec!["Tax Rate"]);
/// let row = Row::from_pairs(2, [("Salary", Cell::Int(1)), ("Tax Rate", Cell::Float(0.2))]);
///
/// let output = dropper.transform(row).unwrap();
/// assert!(!output.contains("Tax Rate"));
/// assert!(output.contains("Salary"));
/// ```
pub struct ColumnDropper {
    columns: Vec<String>,
}

impl ColumnDropper {
    /// Create a new column dropper with the specified columns to remove
    pub fn new(columns: Vec<&str>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a column dropper for the roster's derived columns
    ///
    /// Drops: Job Rating, New Salary, Tax Rate, 2.91%
    pub fn roster_derived_columns() -> Self {
        Self::new(DROPPED_COLUMNS.to_vec())
    }
}

impl Transformer for ColumnDropper {
    type Input = Row;
    type Output = Row;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for column in &self.columns {
            if input.remove(column).is_none() {
                eyre::bail!(
                    "Cannot drop column '{}': not found in row {}",
                    column,
                    input.line()
                );
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn roster_row() -> Row {
        Row::from_pairs(
            2,
            [
                ("Employee Name", Cell::Text("Ann".into())),
                ("Job Rating", Cell::Int(3)),
                ("Salary", Cell::Int(55000)),
                ("New Salary", Cell::Int(57000)),
                ("Tax Rate", Cell::Float(0.2)),
                ("2.91%", Cell::Float(0.05)),
            ],
        )
    }

    #[test]
    fn test_drop_roster_columns() {
        let output = ColumnDropper::roster_derived_columns()
            .transform(roster_row())
            .unwrap();

        assert_eq!(
            output.columns().collect::<Vec<_>>(),
            vec!["Employee Name", "Salary"]
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut row = roster_row();
        row.remove("2.91%");

        let err = ColumnDropper::roster_derived_columns()
            .transform(row)
            .unwrap_err();
        assert!(err.to_string().contains("Cannot drop column '2.91%'"));
    }

    #[test]
    fn test_transform_many() {
        let dropper = ColumnDropper::new(vec!["Job Rating"]);
        let outputs = dropper
            .transform_many(vec![roster_row(), roster_row()])
            .unwrap();

        assert_eq!(outputs.len(), 2);
        assert!(outputs.iter().all(|row| !row.contains("Job Rating")));
    }
}
