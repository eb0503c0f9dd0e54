//! In-memory tabular dataset — a header row plus string cells.
//!
//! This is the boundary between whatever produced the data (CSV file,
//! spreadsheet export, test fixture) and the audit pipeline. Cells stay
//! as text; typing happens in the normalizer.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows:    Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string slices. Handy for fixtures.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Position of a column by exact header name. First match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source line of a data row, counting the header as line 1.
    pub fn line_of(row_index: usize) -> usize {
        row_index + 2
    }
}
