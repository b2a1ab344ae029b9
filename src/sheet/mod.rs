//! Spreadsheet reading
//!
//! Reads one named sheet of a workbook into ordered rows of typed cells.
//! The first row of the sheet is the header row.

mod cell;
mod reader;
mod row;

pub use cell::Cell;
pub use reader::{RawSheet, SheetExtractor, read_sheet};
pub use row::Row;
