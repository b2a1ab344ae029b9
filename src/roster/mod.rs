//! The employee roster domain
//!
//! Column names, the destination table schema, the name normalizer and the
//! typed [`EmployeeRecord`], plus [`load_employee_records`] which reads a
//! roster sheet and returns publishable records.

mod name;
mod record;
mod schema;

pub use name::normalize_name;
pub use record::EmployeeRecord;
pub use schema::*;

use crate::etl::{Extractor, Transformer};
use crate::sheet::SheetExtractor;
use crate::transform::roster_transformer;
use eyre::Result;
use std::path::Path;

/// Extractor for a roster sheet that insists on every source column
pub fn roster_extractor(path: impl AsRef<Path>, sheet: &str) -> SheetExtractor {
    SheetExtractor::new(path.as_ref(), sheet).require_columns(source_columns())
}

/// Read a roster sheet and return its cleaned records
///
/// Every record has exactly the destination columns, a normalized name,
/// and all other fields passed through from the sheet.
///
/// # Errors
/// Returns an error if the file or sheet does not exist, a source column is
/// missing, or a cell cannot be read as its column's type.
pub async fn load_employee_records(
    path: impl AsRef<Path>,
    sheet: &str,
) -> Result<Vec<EmployeeRecord>> {
    let rows = roster_extractor(path, sheet).extract().await?;
    roster_transformer().transform_many(rows)
}
