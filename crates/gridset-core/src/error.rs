//! Error types for gridset-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridset-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell or column reference
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A row was pushed with the wrong number of values
    #[error("Row has {actual} values but table '{table}' declares {expected} columns")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },
}
