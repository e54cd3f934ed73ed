//! The rule table loaded from the input sheet
//!
//! Layout of the source grid:
//!
//! | row | contents                                                     |
//! |-----|--------------------------------------------------------------|
//! | 0   | column labels (informational only)                           |
//! | 1   | titles: rule column, group column, then one per category     |
//! | 2.. | data: rule cell (A), group cell (B), category values (C...)  |

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::worksheet::Worksheet;

/// Index of the rule column (A)
pub const RULE_COLUMN: usize = 0;

/// Index of the group column (B)
pub const GROUP_COLUMN: usize = 1;

/// Number of non-category columns before the first category
pub const LEADING_COLUMNS: usize = 2;

/// Rows above the first data row: column labels and titles
pub const HEADER_ROWS: usize = 2;

/// An immutable, validated rule table
///
/// Every row, the header rows included, is padded with [`CellValue::Empty`]
/// to the width of the widest row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    column_labels: Vec<CellValue>,
    category_titles: Vec<CellValue>,
    data: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table from a row-major grid
    ///
    /// Fails with [`Error::EmptySheet`] when the grid holds no non-blank
    /// cell, and with [`Error::MissingHeaderRows`] when it has fewer than
    /// two rows.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if rows.iter().flatten().all(CellValue::is_blank) {
            return Err(Error::EmptySheet);
        }
        if rows.len() < HEADER_ROWS {
            return Err(Error::MissingHeaderRows(rows.len()));
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = rows.into_iter().map(|mut row| {
            row.resize(width, CellValue::Empty);
            row
        });

        // Length checked above
        let column_labels = rows.next().unwrap_or_default();
        let category_titles = rows.next().unwrap_or_default();
        let data = rows.collect();

        Ok(Self {
            column_labels,
            category_titles,
            data,
        })
    }

    /// Build a table from the cells of a worksheet
    pub fn from_worksheet(worksheet: Worksheet) -> Result<Self> {
        Self::from_rows(worksheet.into_rows())
    }

    /// Number of columns, including the rule and group columns
    pub fn width(&self) -> usize {
        self.category_titles.len()
    }

    /// Row 0: column labels
    pub fn column_labels(&self) -> &[CellValue] {
        &self.column_labels
    }

    /// Row 1: titles, with the rule and group titles at indices 0 and 1
    pub fn category_titles(&self) -> &[CellValue] {
        &self.category_titles
    }

    /// Title of the column at `index`, if within bounds
    pub fn title(&self, index: usize) -> Option<&CellValue> {
        self.category_titles.get(index)
    }

    /// Rows 2.. of the source grid
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        &self.data
    }

    /// Find a column by its rendered title
    ///
    /// When several columns share a title the first one wins. Blank titles
    /// never match.
    pub fn column_index(&self, title: &str) -> Option<usize> {
        self.category_titles
            .iter()
            .position(|t| !t.is_blank() && t.to_string() == title)
    }

    /// Values of a column across all data rows, in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.data.iter().filter_map(move |row| row.get(index))
    }
}

impl TryFrom<Worksheet> for RawTable {
    type Error = Error;

    fn try_from(worksheet: Worksheet) -> Result<Self> {
        Self::from_worksheet(worksheet)
    }
}
