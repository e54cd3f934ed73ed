//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while reading CSV
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV or invalid UTF-8
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The grid does not fit in a worksheet
    #[error("Core error: {0}")]
    Core(#[from] kwcombo_core::Error),
}
