//! Roster column names and the destination table shape

use crate::publish::{Column, ColumnType, TableSchema};

pub const EMPLOYEE_NAME: &str = "Employee Name";
pub const BUILDING: &str = "Building";
pub const DEPARTMENT: &str = "Department";
pub const STATUS: &str = "Status";
pub const HIRE_DATE: &str = "Hire Date";
pub const MONTH: &str = "Month";
pub const YEARS: &str = "Years";
pub const BENEFITS: &str = "Benefits";
pub const SALARY: &str = "Salary";

/// Derived columns of the source sheet that are never published
pub const DROPPED_COLUMNS: [&str; 4] = ["Job Rating", "New Salary", "Tax Rate", "2.91%"];

pub const DEFAULT_WORKBOOK: &str = "H+ Sport Employees.xlsx";
pub const DEFAULT_SHEET: &str = "Emp";
pub const DEFAULT_TABLE: &str = "Employees";

/// Destination table, in column order
pub const EMPLOYEE_SCHEMA: TableSchema = TableSchema::new(&[
    Column::new(EMPLOYEE_NAME, ColumnType::Text),
    Column::new(BUILDING, ColumnType::Text),
    Column::new(DEPARTMENT, ColumnType::Text),
    Column::new(STATUS, ColumnType::Text),
    Column::new(HIRE_DATE, ColumnType::Date),
    Column::new(MONTH, ColumnType::Text),
    Column::new(YEARS, ColumnType::Integer),
    Column::new(BENEFITS, ColumnType::Text),
    Column::new(SALARY, ColumnType::Numeric),
]);

/// Every column the source sheet must provide: the published ones plus the dropped ones
pub fn source_columns() -> impl Iterator<Item = &'static str> {
    EMPLOYEE_SCHEMA
        .column_names()
        .chain(DROPPED_COLUMNS.iter().copied())
}
