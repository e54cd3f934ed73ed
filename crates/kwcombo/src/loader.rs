//! Table loading by file format

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use kwcombo_core::{RawTable, Worksheet};
use kwcombo_xlsx::XlsxReader;
use log::info;

use crate::error::{LoadError, LoadResult};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Office Open XML workbook (`.xlsx`, `.xlsm`), first worksheet
    Xlsx,
    /// Comma-separated values
    #[cfg(feature = "csv")]
    Csv,
}

impl TableFormat {
    /// Format for a file extension, case-insensitive
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(TableFormat::Xlsx),
            #[cfg(feature = "csv")]
            "csv" => Some(TableFormat::Csv),
            _ => None,
        }
    }

    /// Format of a path, judged by its extension
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))
    }
}

/// A column's label (row 0) next to its title (row 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub label: String,
    pub title: String,
}

/// Load a rule table from a file
///
/// # Example
///
/// ```rust,no_run
/// let table = kwcombo::load_table("resources/keyword_rules.xlsx").unwrap();
/// println!("{} data rows", table.data_rows().len());
/// ```
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let format = TableFormat::from_path(path)?;
    let file = File::open(path)?;
    let table = load_table_from_reader(BufReader::new(file), format)?;

    info!(
        "Loaded {}: {} data rows, {} columns",
        path.display(),
        table.data_rows().len(),
        table.width()
    );
    Ok(table)
}

/// Load a rule table from in-memory or streamed data
pub fn load_table_from_reader<R: Read + Seek>(reader: R, format: TableFormat) -> LoadResult<RawTable> {
    let worksheet = load_worksheet_from_reader(reader, format)?;
    Ok(RawTable::from_worksheet(worksheet)?)
}

/// Read the raw grid without validating the rule table layout
pub fn load_worksheet_from_reader<R: Read + Seek>(
    reader: R,
    format: TableFormat,
) -> LoadResult<Worksheet> {
    match format {
        TableFormat::Xlsx => Ok(XlsxReader::read_first_sheet(reader)?),
        #[cfg(feature = "csv")]
        // Fields stay text so category values render exactly as written
        TableFormat::Csv => Ok(kwcombo_csv::CsvReader::read(
            reader,
            &kwcombo_csv::CsvReadOptions {
                detect_numbers: false,
                ..Default::default()
            },
        )?),
    }
}

/// Columns where both the label and the title are present
pub fn column_catalog(table: &RawTable) -> Vec<ColumnInfo> {
    table
        .column_labels()
        .iter()
        .zip(table.category_titles())
        .filter(|(label, title)| !label.is_blank() && !title.is_blank())
        .map(|(label, title)| ColumnInfo {
            label: label.to_string(),
            title: title.to_string(),
        })
        .collect()
}
