//! Prelude module - common imports for kwcombo users
//!
//! ```rust
//! use kwcombo::prelude::*;
//! ```

pub use crate::{
    // Cell and table types
    CellValue,
    RawTable,
    Workbook,
    Worksheet,

    // Engine types
    DashboardSummary,
    ExpansionOptions,
    GeneratedKeyword,

    // Session
    Session,
    TableFormat,

    // Error types
    ExportError,
    ExpansionError,
    LoadError,

    // Extension traits
    WorkbookExt,

    // I/O functions
    load_table,
    sample_template,
};
