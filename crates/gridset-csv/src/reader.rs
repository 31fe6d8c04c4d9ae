//! CSV reader
//!
//! The first record always supplies the column names; there is no
//! positional-header mode for delimited text. One table per file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use gridset_core::Table;

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a table named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        let file = File::open(path)?;
        Self::read(file, &name)
    }

    /// Read CSV from a reader into a table with the given name
    pub fn read<R: Read>(reader: R, name: &str) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut table = Table::with_columns(name, headers);
        let width = table.column_count();

        for result in csv_reader.records() {
            let record = result?;

            // Ragged input: short records pad with empty fields, long
            // records truncate to the header width.
            let mut row = Vec::with_capacity(width);
            for i in 0..width {
                row.push(record.get(i).unwrap_or_default().to_string());
            }

            table.push_row(row)?;
        }

        Ok(table)
    }
}
