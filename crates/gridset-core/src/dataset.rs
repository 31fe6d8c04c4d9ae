//! In-memory tabular dataset
//!
//! A [`Dataset`] is an ordered list of [`Table`]s; a table has named columns
//! and dense rows of string values. Readers materialize sparse input into
//! this shape, writers walk it in order. The dataset owns nothing beyond the
//! values themselves and holds no codec state.

use crate::error::{Error, Result};

/// How column names are derived when reading a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Row 1 supplies the column names; it is excluded from the data rows.
    Explicit,
    /// Column letters double as column names, sorted lexically; every row
    /// (including row 1) is data.
    #[default]
    Positional,
}

/// A named table: ordered columns, dense rows of string values.
///
/// Every row holds exactly one value per declared column; absent source
/// cells are represented by the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a table with the given column names
    pub fn with_columns<S: Into<String>>(name: S, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// The table name (used as the sheet name on write)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name, if declared
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row; its length must match the declared columns
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// A full row by index
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Iterate over data rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Look up a single value by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let pos = self.column_position(column)?;
        self.rows.get(row).map(|r| r[pos].as_str())
    }
}

/// An ordered collection of tables, one per sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table
    pub fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Whether the dataset holds no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// A table by position
    pub fn table(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    /// A table by name
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Iterate over tables in order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }
}

impl FromIterator<Table> for Dataset {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
