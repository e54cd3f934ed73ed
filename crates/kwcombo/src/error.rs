//! Load and export error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loading rule tables
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type for exporting generated keywords
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Errors that prevent a rule table from loading
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file does not exist
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file extension is not a supported table format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The XLSX package could not be read
    #[error("XLSX error: {0}")]
    Xlsx(#[from] kwcombo_xlsx::XlsxError),

    /// The CSV data could not be read
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] kwcombo_csv::CsvError),

    /// The sheet does not have the rule table layout
    #[error("Invalid rule table: {0}")]
    Table(#[from] kwcombo_core::Error),
}

/// Errors that prevent the result workbook from being written
///
/// Generated rows stay valid when an export fails, so the export can be
/// retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export was requested before any keywords were generated
    #[error("No keywords have been generated yet")]
    NothingGenerated,

    /// The output directory or file could not be written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be encoded
    #[error("XLSX error: {0}")]
    Xlsx(#[from] kwcombo_xlsx::XlsxError),

    /// A sheet could not be added to the workbook
    #[error("Workbook error: {0}")]
    Workbook(#[from] kwcombo_core::Error),
}
