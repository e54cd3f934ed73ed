//! Sample input template

use std::path::Path;

use kwcombo_core::{CellValue, Workbook, Worksheet};
use log::info;

use crate::error::ExportResult;
use crate::WorkbookExt;

/// Sheet name of the template
pub const TEMPLATE_SHEET: &str = "Rules";

const CATEGORIES: [&str; 4] = ["Match Type", "Region", "Product", "Modifier"];

const EXAMPLE_ROWS: [[&str; 6]; 4] = [
    ["1,2,3", "Brand", "Exact", "North", "Shoes", "buy"],
    ["2,3", "Generic", "Phrase", "South", "Boots", "cheap"],
    ["3,4", "", "Broad", "", "Sandals", "best"],
    ["1,3,4", "Brand", "", "", "", "online"],
];

/// The input template offered for download
///
/// Row 0 holds the column numbers rules refer to, row 1 the category
/// titles, then a few example rules. Blank example cells are left empty.
pub fn sample_template() -> ExportResult<Workbook> {
    let mut sheet = Worksheet::new(TEMPLATE_SHEET);

    let mut numbers = vec![CellValue::from("rule"), CellValue::from("group")];
    numbers.extend((1..=CATEGORIES.len()).map(CellValue::from));
    sheet.push_row(numbers)?;

    sheet.push_row(["rule", "group"].into_iter().chain(CATEGORIES))?;

    for row in EXAMPLE_ROWS {
        sheet.push_row(row.into_iter().map(|v| {
            if v.is_empty() {
                CellValue::Empty
            } else {
                CellValue::from(v)
            }
        }))?;
    }

    let mut workbook = Workbook::new();
    workbook.add_existing_worksheet(sheet)?;
    Ok(workbook)
}

/// Save the sample template as XLSX
pub fn write_template<P: AsRef<Path>>(path: P) -> ExportResult<()> {
    let path = path.as_ref();
    sample_template()?.save(path)?;
    info!("Wrote template to {}", path.display());
    Ok(())
}
