//! # gridset-core
//!
//! Core data structures for the gridset tabular conversion library.
//!
//! This crate provides the fundamental types used throughout gridset:
//! - [`Dataset`] and [`Table`] - the in-memory tabular model
//! - [`HeaderPolicy`] - how column names are derived when reading
//! - [`address`] - column-letter arithmetic and cell reference parsing
//!
//! ## Example
//!
//! ```rust
//! use gridset_core::{Dataset, Table};
//!
//! let mut table = Table::with_columns("People", vec!["Name".into(), "Age".into()]);
//! table.push_row(vec!["Ada".into(), "36".into()]).unwrap();
//!
//! let mut dataset = Dataset::new();
//! dataset.push_table(table);
//!
//! assert_eq!(dataset.table(0).unwrap().value(0, "Name"), Some("Ada"));
//! ```

pub mod address;
pub mod dataset;
pub mod error;

// Re-exports for convenience
pub use dataset::{Dataset, HeaderPolicy, Table};
pub use error::{Error, Result};
