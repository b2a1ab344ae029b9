//! Name normalizer transformer
//!
//! Rewrites one text column of every row with [`normalize_name`].

use crate::etl::Transformer;
use crate::roster::{EMPLOYEE_NAME, normalize_name};
use crate::sheet::{Cell, Row};
use eyre::{Result, eyre};

/// Transformer that normalizes a name column in place
///
/// Non-text cells are rendered as text first and an empty cell becomes an
/// empty name. A row without the column is an error.
///
/// # Example
/// ```
/// use roster_publisher::transform::NameNormalizer;
/// use roster_publisher::etl::Transformer;
/// use roster_publisher::sheet::{Cell, Row};
///
/// let row = Row::from_pairs(2, [("Employee Name", Cell::Text(" José,  Smith ".into()))]);
/// let row = NameNormalizer::employee_name().transform(row).unwrap();
/// assert_eq!(row.get("Employee Name"), Some(&Cell::Text("Jos Smith".into())));
/// ```
pub struct NameNormalizer {
    column: String,
}

impl NameNormalizer {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// Normalizer for the roster's `Employee Name` column
    pub fn employee_name() -> Self {
        Self::new(EMPLOYEE_NAME)
    }
}

impl Transformer for NameNormalizer {
    type Input = Row;
    type Output = Row;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        let line = input.line();
        let cell = input
            .get_mut(&self.column)
            .ok_or_else(|| eyre!("Column '{}' not found in row {}", self.column, line))?;

        let raw = cell.as_text().unwrap_or_default();
        *cell = Cell::Text(normalize_name(&raw));
        Ok(input)
    }
}
