//! # kwcombo-core
//!
//! Core data structures for the kwcombo keyword combination generator.
//!
//! This crate provides the fundamental types used throughout kwcombo:
//! - [`CellValue`] - Represents cell values (numbers, strings, booleans, errors)
//! - [`CellAddress`] - A1-style cell addressing
//! - [`Workbook`], [`Worksheet`] - Dense sheets used for reading and writing
//! - [`RawTable`] - The validated rule table the engine expands
//!
//! ## Example
//!
//! ```rust
//! use kwcombo_core::{CellValue, RawTable};
//!
//! let table = RawTable::from_rows(vec![
//!     vec!["".into(), "".into(), CellValue::from(1)],
//!     vec!["rule".into(), "group".into(), "Match Type".into()],
//!     vec!["1".into(), "G1".into(), "Exact".into()],
//! ])
//! .unwrap();
//!
//! assert_eq!(table.column_index("Match Type"), Some(2));
//! ```

pub mod cell;
pub mod error;
pub mod table;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellValue, DistinctKey, SharedString};
pub use error::{Error, Result};
pub use table::{RawTable, GROUP_COLUMN, HEADER_ROWS, LEADING_COLUMNS, RULE_COLUMN};
pub use workbook::{validate_sheet_name, Workbook, INVALID_SHEET_NAME_CHARS};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;
