//! # kwcombo-xlsx
//!
//! XLSX (Office Open XML) reader and writer for kwcombo.
//!
//! The reader turns worksheets into dense grids of [`CellValue`](kwcombo_core::CellValue)s,
//! keeping only cell values (cached results for formulas). The writer
//! produces a plain multi-sheet workbook with inline strings and a bold
//! header row.

pub mod error;
pub mod escape;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
