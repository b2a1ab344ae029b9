//! A single sheet row keyed by header

use super::Cell;

/// One data row of a sheet
///
/// Cells are kept in header order. `line` is the 1-based row number in the
/// workbook, used to point error messages at the offending row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    line: usize,
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new(line: usize, cells: Vec<(String, Cell)>) -> Self {
        Self { line, cells }
    }

    /// Build a row from `(column, cell)` pairs
    pub fn from_pairs<I, S>(line: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Cell)>,
        S: Into<String>,
    {
        Self::new(
            line,
            pairs
                .into_iter()
                .map(|(column, cell)| (column.into(), cell))
                .collect(),
        )
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Cell> {
        self.cells
            .iter_mut()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Remove a column, returning its cell if it was present
    pub fn remove(&mut self, column: &str) -> Option<Cell> {
        let index = self.cells.iter().position(|(c, _)| c == column)?;
        Some(self.cells.remove(index).1)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in sheet order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Take ownership of a column's cell, leaving `Cell::Empty` in its place
    pub fn take(&mut self, column: &str) -> Option<Cell> {
        self.get_mut(column)
            .map(|cell| std::mem::replace(cell, Cell::Empty))
    }
}
