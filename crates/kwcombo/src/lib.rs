//! # kwcombo
//!
//! Expand rule tables into Cartesian keyword combinations and export them
//! as a multi-sheet XLSX workbook.
//!
//! A rule table is a sheet whose first row numbers the category columns,
//! whose second row titles them, and whose remaining rows each carry a rule
//! (column A, e.g. `1,3`) and a group (column B). Every rule expands to the
//! Cartesian product of the distinct values found under the columns it
//! references.
//!
//! ## Features
//!
//! - Load rule tables from XLSX or CSV
//! - Expand, group and summarize keywords
//! - Export a Dashboard sheet plus one sheet per group
//! - Build a sample input template
//!
//! ## Example
//!
//! ```rust
//! use kwcombo::prelude::*;
//!
//! let table = RawTable::from_rows(vec![
//!     vec!["".into(), "".into(), CellValue::from(1), CellValue::from(2)],
//!     vec!["rule".into(), "group".into(), "Match Type".into(), "Region".into()],
//!     vec!["1,2".into(), "G1".into(), "Exact".into(), "North".into()],
//!     vec!["2".into(), "".into(), "Phrase".into(), "South".into()],
//! ])
//! .unwrap();
//!
//! let mut session = Session::from_table(table);
//! session.generate(&ExpansionOptions::default()).unwrap();
//!
//! assert_eq!(session.rows().len(), 6);
//! assert_eq!(session.groups(), vec!["G1", "ungrouped"]);
//!
//! // Save to file
//! // session.export_to_dir("output").unwrap();
//! ```

pub mod error;
pub mod exporter;
pub mod loader;
pub mod prelude;
pub mod session;
pub mod template;

pub use error::{ExportError, ExportResult, LoadError, LoadResult};
pub use exporter::{
    build_workbook, export_to_bytes, export_to_dir, format_count, group_sheets, output_file_name,
    sanitize_sheet_name, GroupSheet, DASHBOARD_SHEET, KEYWORD_HEADERS,
};
pub use loader::{
    column_catalog, load_table, load_table_from_reader, load_worksheet_from_reader, ColumnInfo,
    TableFormat,
};
pub use session::Session;
pub use template::{sample_template, write_template, TEMPLATE_SHEET};

// Re-export core types
pub use kwcombo_core::{
    CellAddress, CellError, CellValue, Error, RawTable, Result, Workbook, Worksheet,
    MAX_SHEET_NAME_LEN,
};

// Re-export engine types
pub use kwcombo_engine::{
    aggregate, aggregate_with, expand, expand_rule, parse_rule, resolve_column, rule_groups,
    summarize, Axis, ColumnGap, CountEntry, DashboardSummary, EmptyReason, Expansion,
    ExpansionError, ExpansionOptions, ExpansionResult, GeneratedKeyword, RuleGroup, RuleOutcome,
    RuleReport, TOP_RULES, UNGROUPED,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use kwcombo_csv::{CsvError, CsvReadOptions, CsvReader};
pub use kwcombo_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open the first sheet of an XLSX or CSV file as a workbook
    fn open<P: AsRef<Path>>(path: P) -> LoadResult<Workbook>;

    /// Save the workbook as XLSX
    fn save<P: AsRef<Path>>(&self, path: P) -> ExportResult<()>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> LoadResult<Workbook> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let format = TableFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let worksheet = load_worksheet_from_reader(std::io::BufReader::new(file), format)?;

        let mut workbook = Workbook::new();
        workbook.add_existing_worksheet(worksheet)?;
        Ok(workbook)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        XlsxWriter::write_file(self, path)?;
        Ok(())
    }
}
