//! # kwcombo-csv
//!
//! CSV reader for kwcombo. Every record becomes one grid row, so a rule
//! table exported from a spreadsheet as CSV loads into the same shape as
//! the same table saved as XLSX.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
