//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use gridset_core::Table;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(table: &Table, path: P) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file)
    }

    /// Write a table to a writer: header record first, then one record
    /// per row
    pub fn write<W: Write>(table: &Table, writer: W) -> CsvResult<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        csv_writer.write_record(table.columns())?;
        for row in table.rows() {
            csv_writer.write_record(row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
