//! Workbook type - an ordered collection of named worksheets

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters Excel rejects in sheet names
pub const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// A workbook (spreadsheet document)
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a workbook with no worksheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over sheet names in order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.worksheets.iter().map(Worksheet::name)
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        validate_sheet_name(worksheet.name())?;
        if self.contains_sheet_name(worksheet.name()) {
            return Err(Error::DuplicateSheetName(worksheet.name().into()));
        }
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Check for an existing sheet with this name (case-insensitive)
    pub fn contains_sheet_name(&self, name: &str) -> bool {
        let name_lower = name.to_lowercase();
        self.worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
    }
}

/// Validate a sheet name against Excel's rules
///
/// Uniqueness is checked by [`Workbook::add_existing_worksheet`].
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    for c in INVALID_SHEET_NAME_CHARS {
        if name.contains(*c) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(
            "Sheet name cannot begin or end with an apostrophe".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();
        assert!(wb.is_empty());

        assert_eq!(wb.add_worksheet_with_name("Dashboard").unwrap(), 0);
        assert_eq!(wb.add_worksheet_with_name("Brand").unwrap(), 1);
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Dashboard", "Brand"]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Dashboard").unwrap();

        // Case-insensitive duplicate check
        assert!(wb.add_worksheet_with_name("DASHBOARD").is_err());
        assert!(wb.add_worksheet_with_name("dashboard").is_err());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet:1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());
        assert!(wb.add_worksheet_with_name("'quoted'").is_err());

        // Too long
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet_with_name(&long_name).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        // 31 multi-byte characters are still a valid name
        let name = "키".repeat(MAX_SHEET_NAME_LEN);
        assert!(validate_sheet_name(&name).is_ok());
    }
}
