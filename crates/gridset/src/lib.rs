//! # gridset
//!
//! Convert tabular data between delimited text (CSV), packaged spreadsheet
//! documents (XLSX), and an in-memory [`Dataset`] of named-column tables.
//!
//! ## Example
//!
//! ```no_run
//! use gridset::{read_document, write_document, HeaderPolicy};
//!
//! // Read a workbook, treating row 1 of each sheet as the header
//! let dataset = read_document("input.xlsx", HeaderPolicy::Explicit).unwrap();
//!
//! // Write it back out as a fresh package
//! write_document(&dataset, "output.xlsx").unwrap();
//! ```
//!
//! Each call is synchronous and self-contained: file and package handles
//! are scoped to the call and released on every exit path.

pub mod format;

// Re-export core types
pub use gridset_core::{Dataset, HeaderPolicy, Table};

// Re-export I/O types
pub use gridset_csv::{CsvError, CsvReader, CsvWriter};
pub use gridset_xlsx::{SheetIdentity, XlsxError, XlsxReader, XlsxWriter};

pub use format::FileFormat;

use std::path::Path;

use log::debug;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the conversion entry points.
///
/// Inner codec errors pass through unchanged so callers can tell malformed
/// input apart from environmental problems.
#[derive(Debug, Error)]
pub enum Error {
    /// The file extension is not one of the recognized formats
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The output path has no parent directory, or the directory does not
    /// exist
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// XLSX codec error
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// CSV codec error
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// Core error
    #[error(transparent)]
    Core(#[from] gridset_core::Error),
}

/// Read a document into a [`Dataset`].
///
/// The format is decided by the file extension before any content is
/// touched. For packaged workbooks every sheet becomes one table, with
/// column names derived per `policy`. For delimited text the first line is
/// always the header and the policy does not apply.
pub fn read_document<P: AsRef<Path>>(path: P, policy: HeaderPolicy) -> Result<Dataset> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

    debug!("reading {} as {:?}", path.display(), format);

    match format {
        FileFormat::Csv => {
            let table = CsvReader::read_file(path)?;
            let mut dataset = Dataset::new();
            dataset.push_table(table);
            Ok(dataset)
        }
        // .xls carries no package; the zip layer rejects it structurally
        FileFormat::Xls | FileFormat::Xlsx => {
            Ok(XlsxReader::read_file(path, policy)?)
        }
    }
}

/// Write a dataset as a packaged workbook at `output_path`.
///
/// The target's parent directory must already exist; missing directories
/// are never created.
pub fn write_document<P: AsRef<Path>>(dataset: &Dataset, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    validate_output_path(output_path)?;

    debug!(
        "writing {} table(s) to {}",
        dataset.table_count(),
        output_path.display()
    );

    Ok(XlsxWriter::write_file(dataset, output_path)?)
}

/// Check that the target has a non-empty, existing parent directory
fn validate_output_path(path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| Error::InvalidOutputPath(path.display().to_string()))?;

    if !parent.is_dir() {
        return Err(Error::InvalidOutputPath(path.display().to_string()));
    }

    Ok(())
}

/// Extension trait adding file I/O to [`Dataset`]
pub trait DatasetExt: Sized {
    /// Open a document from a file
    fn open<P: AsRef<Path>>(path: P, policy: HeaderPolicy) -> Result<Self>;

    /// Save as a packaged workbook
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl DatasetExt for Dataset {
    fn open<P: AsRef<Path>>(path: P, policy: HeaderPolicy) -> Result<Dataset> {
        read_document(path, policy)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_document(self, path)
    }
}
