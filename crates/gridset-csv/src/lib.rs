//! # gridset-csv
//!
//! Delimited-text reader and writer for gridset.

mod error;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use reader::CsvReader;
pub use writer::CsvWriter;
