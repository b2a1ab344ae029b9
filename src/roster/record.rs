//! Typed employee record

use super::schema::*;
use crate::client::BindValue;
use crate::publish::{TableRow, TableSchema};
use crate::sheet::{Cell, Row};
use chrono::NaiveDate;
use eyre::Result;

/// One published roster row
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub name: String,
    pub building: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub month: Option<String>,
    pub years: Option<i64>,
    pub benefits: Option<String>,
    pub salary: Option<f64>,
}

impl EmployeeRecord {
    /// Values rendered for display, in schema order (empty string for NULL)
    pub fn display_values(&self) -> Vec<String> {
        self.values()
            .iter()
            .map(|value| match value {
                BindValue::Null => String::new(),
                BindValue::Text(s) => s.clone(),
                BindValue::Integer(i) => i.to_string(),
                BindValue::Real(f) => f.to_string(),
                BindValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            })
            .collect()
    }
}

impl TableRow for EmployeeRecord {
    fn schema() -> TableSchema {
        EMPLOYEE_SCHEMA
    }

    fn values(&self) -> Vec<BindValue> {
        vec![
            BindValue::Text(self.name.clone()),
            self.building.clone().into(),
            self.department.clone().into(),
            self.status.clone().into(),
            self.hire_date.into(),
            self.month.clone().into(),
            self.years.into(),
            self.benefits.clone().into(),
            self.salary.into(),
        ]
    }
}

impl TryFrom<&Row> for EmployeeRecord {
    type Error = eyre::Report;

    /// Coerce a sheet row onto the record's field types
    ///
    /// Empty cells become `None` (the name becomes `""`). Cells that cannot
    /// be read as the column's type are an error naming the row and column.
    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            name: text(row, EMPLOYEE_NAME).unwrap_or_default(),
            building: text(row, BUILDING),
            department: text(row, DEPARTMENT),
            status: text(row, STATUS),
            hire_date: typed(row, HIRE_DATE, "a date", Cell::as_date)?,
            month: text(row, MONTH),
            years: typed(row, YEARS, "a whole number", Cell::as_integer)?,
            benefits: text(row, BENEFITS),
            salary: typed(row, SALARY, "a number", Cell::as_number)?,
        })
    }
}

fn text(row: &Row, column: &str) -> Option<String> {
    row.get(column).and_then(Cell::as_text)
}

fn typed<T>(
    row: &Row,
    column: &str,
    expected: &str,
    convert: impl Fn(&Cell) -> Option<T>,
) -> Result<Option<T>> {
    match row.get(column) {
        None | Some(Cell::Empty) => Ok(None),
        Some(cell) => match convert(cell) {
            Some(value) => Ok(Some(value)),
            None => eyre::bail!(
                "Row {}: column '{}' expects {}, found {} '{}'",
                row.line(),
                column,
                expected,
                cell.type_name(),
                cell
            ),
        },
    }
}
