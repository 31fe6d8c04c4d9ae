//! # gridset-xlsx
//!
//! XLSX (Office Open XML) reader and writer for gridset.
//!
//! The reader rebuilds dense, header-aware tables from the sparse cell
//! streams of a workbook package; the writer serializes a dataset back into
//! a minimal package with every value as inline text.

mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::{assign_identities, SheetIdentity, XlsxWriter};
