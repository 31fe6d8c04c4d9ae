//! Recognized file formats

use std::path::Path;

/// The file formats the codec recognizes by extension.
///
/// `.xls` is accepted at the gate for compatibility; it is handed to the
/// package reader, which rejects the binary layout structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Legacy binary workbook
    Xls,
    /// Office Open XML workbook package
    Xlsx,
}

impl FileFormat {
    /// Detect the format from a path's extension, case-insensitively.
    /// Returns `None` for unrecognized or missing extensions.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "xls" => Some(FileFormat::Xls),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }
}
