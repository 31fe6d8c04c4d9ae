//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A row element without a row-index attribute; the whole sheet is
    /// rejected before any header or data work
    #[error("Unsupported file version: sheet '{0}' has a row without an index")]
    UnsupportedVersion(String),

    /// Header row requested but no row with index 1 exists
    #[error("Sheet '{0}' has no header row")]
    MissingHeaderRow(String),

    /// Header row exists but holds no cells
    #[error("Sheet '{0}' has an empty header row")]
    MissingHeader(String),

    /// A shared-string reference could not be resolved
    #[error("Cell resolution failed: {0}")]
    CellResolution(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] gridset_core::Error),
}
