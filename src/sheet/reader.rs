//! Workbook sheet reader
//!
//! Opens `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` workbooks through
//! calamine and turns one named sheet into [`Row`]s.

use super::{Cell, Row};
use crate::etl::Extractor;
use calamine::{Data, Reader, open_workbook_auto};
use eyre::{Context, Result, eyre};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The contents of one sheet: its headers and its non-empty data rows
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read a named sheet from a workbook
///
/// The first row is taken as the header row. Rows where every cell is empty
/// are skipped. A column without a header is tolerated only when it holds no
/// data.
///
/// # Errors
/// Returns an error if:
/// - The file does not exist or is not a readable workbook
/// - The sheet does not exist (the message lists the sheets that do)
/// - The sheet has no header row, or two columns share a header
/// - A data cell sits under a blank header
pub fn read_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<RawSheet> {
    let path = path.as_ref();
    if !path.exists() {
        eyre::bail!("Spreadsheet not found: {}", path.display());
    }

    log::debug!("Opening workbook {}", path.display());
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        eyre::bail!(
            "Sheet '{}' not found in {}. Available sheets: {}",
            sheet,
            path.display(),
            sheet_names.join(", ")
        );
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Failed to read sheet: {}", sheet))?;
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| eyre!("Sheet '{}' is empty, expected a header row", sheet))?;
    let headers: Vec<Option<String>> = header_row.iter().map(header_text).collect();

    let mut seen = HashSet::new();
    for header in headers.iter().flatten() {
        if !seen.insert(header.as_str()) {
            eyre::bail!("Duplicate column '{}' in sheet '{}'", header, sheet);
        }
    }

    let mut data_rows = Vec::new();
    for (offset, cells) in rows.enumerate() {
        let line = start_row + offset + 2;
        let cells: Vec<Cell> = cells.iter().map(Cell::from).collect();
        if cells.iter().all(Cell::is_empty) {
            log::trace!("Skipping empty row {}", line);
            continue;
        }

        let mut pairs = Vec::with_capacity(headers.len());
        for (index, cell) in cells.into_iter().enumerate() {
            match headers.get(index).and_then(|h| h.as_ref()) {
                Some(header) => pairs.push((header.clone(), cell)),
                None if cell.is_empty() => {}
                None => eyre::bail!(
                    "Row {} of sheet '{}' has a value in column {} which has no header",
                    line,
                    sheet,
                    index + 1
                ),
            }
        }
        data_rows.push(Row::new(line, pairs));
    }

    Ok(RawSheet {
        name: sheet.to_string(),
        headers: headers.into_iter().flatten().collect(),
        rows: data_rows,
    })
}

fn header_text(data: &Data) -> Option<String> {
    Cell::from(data)
        .as_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Extractor that reads the rows of one workbook sheet
///
/// # Example
/// ```no_run
/// use roster_publisher::sheet::SheetExtractor;
/// use roster_publisher::etl::Extractor;
///
/// # async fn example() -> eyre::Result<()> {
/// let extractor = SheetExtractor::new("H+ Sport Employees.xlsx", "Emp");
/// let rows = extractor.extract().await?;
/// println!("Read {} rows", rows.len());
/// # Ok(())
/// # }
/// ```
pub struct SheetExtractor {
    path: PathBuf,
    sheet: String,
    required: Vec<String>,
}

impl SheetExtractor {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
            required: Vec::new(),
        }
    }

    /// Fail extraction unless the header row has all of `columns`
    ///
    /// Checked against the headers, so a sheet with no data rows is still
    /// validated.
    pub fn require_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

impl Extractor for SheetExtractor {
    type Item = Row;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let sheet = read_sheet(&self.path, &self.sheet)?;

        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|column| !sheet.headers.contains(column))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            eyre::bail!(
                "Sheet '{}' is missing expected column(s): {}",
                sheet.name,
                missing.join(", ")
            );
        }

        log::info!(
            "Read {} row(s) with {} column(s) from sheet '{}'",
            sheet.rows.len(),
            sheet.headers.len(),
            sheet.name
        );
        Ok(sheet.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_workbook(dir: &TempDir, rows: &[&[&str]]) -> PathBuf {
        let path = dir.path().join("roster.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Emp").unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let err = read_sheet("/nonexistent/roster.xlsx", "Emp").unwrap_err();
        assert!(err.to_string().contains("Spreadsheet not found"));
    }

    #[test]
    fn test_missing_sheet_lists_available() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[&["Employee Name"], &["Ann"]]);

        let err = read_sheet(&path, "Staff").unwrap_err().to_string();
        assert!(err.contains("Sheet 'Staff' not found"));
        assert!(err.contains("Available sheets: Emp"));
    }

    #[test]
    fn test_reads_headers_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &[
                &["Employee Name", " Building "],
                &["Ann", "A"],
                &["", ""],
                &["Bob", ""],
            ],
        );

        let sheet = read_sheet(&path, "Emp").unwrap();
        assert_eq!(sheet.headers, vec!["Employee Name", "Building"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].line(), 2);
        assert_eq!(sheet.rows[0].get("Building"), Some(&Cell::Text("A".into())));
        assert_eq!(sheet.rows[1].line(), 4);
        assert_eq!(sheet.rows[1].get("Building"), Some(&Cell::Empty));
    }

    #[test]
    fn test_duplicate_header() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[&["Salary", "Salary"], &["1", "2"]]);

        let err = read_sheet(&path, "Emp").unwrap_err();
        assert!(err.to_string().contains("Duplicate column 'Salary'"));
    }

    #[test]
    fn test_value_under_blank_header() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[&["Employee Name", "", "Status"], &["Ann", "x", "Active"]]);

        let err = read_sheet(&path, "Emp").unwrap_err();
        assert!(err.to_string().contains("column 2 which has no header"));
    }

    #[tokio::test]
    async fn test_extractor() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[&["Employee Name"], &["Ann"], &["Bob"]]);

        let rows = SheetExtractor::new(&path, "Emp").extract().await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_required_columns_checked_without_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[&["Employee Name", "Salary"]]);

        let err = SheetExtractor::new(&path, "Emp")
            .require_columns(["Employee Name", "Tax Rate", "2.91%"])
            .extract()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing expected column(s): Tax Rate, 2.91%"));

        let rows = SheetExtractor::new(&path, "Emp")
            .require_columns(["Salary"])
            .extract()
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
