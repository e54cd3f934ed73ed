//! Result workbook: a Dashboard sheet followed by one sheet per group

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use chrono::{Local, NaiveDateTime};
use kwcombo_core::{
    CellValue, Workbook, Worksheet, INVALID_SHEET_NAME_CHARS, MAX_SHEET_NAME_LEN,
};
use kwcombo_engine::{DashboardSummary, GeneratedKeyword};
use kwcombo_xlsx::XlsxWriter;
use log::{info, warn};

use crate::error::ExportResult;

/// Name of the statistics sheet
pub const DASHBOARD_SHEET: &str = "Dashboard";

/// Header of every group sheet
pub const KEYWORD_HEADERS: [&str; 5] = ["rule", "group", "columns", "keyword", "components"];

/// Timestamp shown on the Dashboard
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp embedded in export file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the export file for a generation time
pub fn output_file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "generated_keywords_{}.xlsx",
        generated_at.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Format a count with `,` thousands separators
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Turn `name` into a valid sheet name that no sheet in `taken` uses
///
/// Invalid characters become `_`, surrounding apostrophes are removed and
/// the name is cut to 31 characters. A blank result becomes `Sheet`.
/// Names are compared case-insensitively; a collision appends ` (2)`,
/// ` (3)`, ... and shortens the base to keep within the length limit.
pub fn sanitize_sheet_name<'a, I>(name: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<String> = taken.into_iter().map(str::to_lowercase).collect();
    let is_taken = |candidate: &str| taken.iter().any(|t| *t == candidate.to_lowercase());

    let replaced: String = name
        .chars()
        .map(|c| {
            if INVALID_SHEET_NAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches('\'');
    let base = if trimmed.trim().is_empty() {
        "Sheet".to_string()
    } else {
        truncate_chars(trimmed, MAX_SHEET_NAME_LEN)
    };

    if !is_taken(&base) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let suffix = format!(" ({})", n);
        let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        let stem = truncate_chars(&base, room);
        let candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    let truncated: String = s.chars().take(max).collect();
    // Cutting may expose a trailing apostrophe
    truncated.trim_end_matches('\'').to_string()
}

/// Build the result workbook
///
/// The first sheet is the Dashboard; then one sheet per group, in the order
/// groups first appear in `rows`, holding that group's rows under
/// [`KEYWORD_HEADERS`].
pub fn build_workbook(
    rows: &[GeneratedKeyword],
    summary: &DashboardSummary,
    generated_at: NaiveDateTime,
) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();
    workbook.add_existing_worksheet(dashboard_sheet(summary, generated_at)?)?;

    for group_sheet in group_sheets(rows) {
        let mut sheet = Worksheet::new(group_sheet.name);
        sheet.push_row(KEYWORD_HEADERS)?;
        for row in group_sheet.rows {
            sheet.push_row([
                row.rule.as_str(),
                row.group.as_str(),
                row.columns.as_str(),
                row.keyword.as_str(),
                row.components.as_str(),
            ])?;
        }
        workbook.add_existing_worksheet(sheet)?;
    }

    Ok(workbook)
}

/// One group's rows and the sheet they are written to
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSheet<'a> {
    /// Sheet name, sanitized and unique within the workbook
    pub name: String,
    pub group: &'a str,
    pub rows: Vec<&'a GeneratedKeyword>,
}

/// The group sheets [`build_workbook`] writes after the Dashboard, in order
pub fn group_sheets(rows: &[GeneratedKeyword]) -> Vec<GroupSheet<'_>> {
    let mut taken = vec![DASHBOARD_SHEET.to_string()];
    let mut sheets = Vec::new();

    for (group, group_rows) in rows_by_group(rows) {
        let name = sanitize_sheet_name(group, taken.iter().map(String::as_str));
        if name != group {
            warn!("Group '{}' written to sheet '{}'", group, name);
        }
        taken.push(name.clone());
        sheets.push(GroupSheet {
            name,
            group,
            rows: group_rows,
        });
    }

    sheets
}

/// Rows of each group, groups in order of first appearance
fn rows_by_group(rows: &[GeneratedKeyword]) -> Vec<(&str, Vec<&GeneratedKeyword>)> {
    let mut positions: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<(&str, Vec<&GeneratedKeyword>)> = Vec::new();

    for row in rows {
        let group = row.group.as_str();
        match positions.get(group) {
            Some(&idx) => groups[idx].1.push(row),
            None => {
                positions.insert(group, groups.len());
                groups.push((group, vec![row]));
            }
        }
    }

    groups
}

fn dashboard_sheet(
    summary: &DashboardSummary,
    generated_at: NaiveDateTime,
) -> ExportResult<Worksheet> {
    let mut sheet = Worksheet::new(DASHBOARD_SHEET);
    let blank = || [CellValue::Empty, CellValue::Empty];
    let heading = |title: &str| [CellValue::from(title), CellValue::Empty];

    sheet.push_row(["Item", "Value"])?;
    sheet.push_row(heading("Keyword Generation Statistics"))?;
    sheet.push_row([
        CellValue::from("Generated at"),
        CellValue::from(generated_at.format(TIMESTAMP_FORMAT).to_string()),
    ])?;
    sheet.push_row([
        CellValue::from("Total keywords"),
        CellValue::from(format_count(summary.total_keywords)),
    ])?;
    sheet.push_row([
        CellValue::from("Total rules"),
        CellValue::from(summary.total_rules),
    ])?;
    sheet.push_row([
        CellValue::from("Total groups"),
        CellValue::from(summary.total_groups),
    ])?;

    sheet.push_row(blank())?;
    sheet.push_row(heading("Keywords per group"))?;
    sheet.push_row(["Group", "Keywords"])?;
    for entry in &summary.group_counts {
        sheet.push_row([entry.name.clone(), format_count(entry.count)])?;
    }

    sheet.push_row(blank())?;
    sheet.push_row(heading("Keywords per rule (top 15)"))?;
    sheet.push_row(["Rule", "Keywords"])?;
    for entry in &summary.rule_counts {
        sheet.push_row([entry.name.clone(), format_count(entry.count)])?;
    }

    Ok(sheet)
}

/// Render the result workbook as XLSX bytes
pub fn export_to_bytes(rows: &[GeneratedKeyword], summary: &DashboardSummary) -> ExportResult<Vec<u8>> {
    let workbook = build_workbook(rows, summary, Local::now().naive_local())?;
    Ok(XlsxWriter::write_to_vec(&workbook)?)
}

/// Write the result workbook into `dir` under a timestamped name
///
/// The directory is created when missing. Returns the written path.
pub fn export_to_dir<P: AsRef<Path>>(
    rows: &[GeneratedKeyword],
    summary: &DashboardSummary,
    dir: P,
) -> ExportResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let generated_at = Local::now().naive_local();
    let path = dir.join(output_file_name(generated_at));
    let workbook = build_workbook(rows, summary, generated_at)?;
    XlsxWriter::write_file(&workbook, &path)?;

    info!(
        "Wrote {} keywords in {} sheets to {}",
        rows.len(),
        workbook.sheet_count(),
        path.display()
    );
    Ok(path)
}
