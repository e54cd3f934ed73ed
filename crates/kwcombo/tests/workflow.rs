//! End-to-end tests (rule file -> session -> exported workbook -> verify)

use kwcombo::prelude::*;
use kwcombo::{XlsxReader, DASHBOARD_SHEET, KEYWORD_HEADERS};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// The rule table used throughout: 3 match types, 2 regions, 2 products
fn rules_workbook() -> Workbook {
    let mut sheet = Worksheet::new("Rules");
    sheet
        .push_row([
            CellValue::from("rule"),
            CellValue::from("group"),
            CellValue::from(1),
            CellValue::from(2),
            CellValue::from(3),
        ])
        .unwrap();
    sheet
        .push_row(["rule", "group", "Match Type", "Region", "Product"])
        .unwrap();
    sheet
        .push_row(["1,2", "Brand", "Exact", "North", "Shoes"])
        .unwrap();
    sheet
        .push_row([
            CellValue::from("2,3"),
            CellValue::Empty,
            CellValue::from("Phrase"),
            CellValue::from("South"),
            CellValue::from("Boots"),
        ])
        .unwrap();
    sheet
        .push_row([
            CellValue::from(3),
            CellValue::from("Brand"),
            CellValue::from("Broad"),
            CellValue::Empty,
            CellValue::Empty,
        ])
        .unwrap();

    let mut workbook = Workbook::new();
    workbook.add_existing_worksheet(sheet).unwrap();
    workbook
}

fn write_rules(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("keyword_rules.xlsx");
    rules_workbook().save(&path).unwrap();
    path
}

/// Load from disk, generate and check the row order
#[test]
fn test_load_and_generate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(dir.path());

    let mut session = Session::load(&path).unwrap();
    assert!(!session.is_generated());

    let expansion = session.generate(&ExpansionOptions::default()).unwrap();
    // "1,2": 3*2, "2,3": 2*2, "3": 2
    assert_eq!(expansion.len(), 12);

    let keywords: Vec<&str> = session.rows().iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(
        &keywords[..6],
        &[
            "Exact North",
            "Exact South",
            "Phrase North",
            "Phrase South",
            "Broad North",
            "Broad South"
        ]
    );
    assert_eq!(keywords[6], "North Shoes");
    assert_eq!(keywords[10], "Shoes");

    assert_eq!(session.groups(), vec!["Brand", "ungrouped"]);
    let summary = session.summary().unwrap();
    assert_eq!(summary.group_count("Brand"), 8);
    assert_eq!(summary.group_count("ungrouped"), 4);
    assert_eq!(summary.total_rules, 3);
}

/// The numeric rule cell `3` is parsed like the text `"3"`
#[test]
fn test_numeric_rule_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(dir.path());

    let mut session = Session::load(&path).unwrap();
    session.generate(&ExpansionOptions::default()).unwrap();

    let last = session.rows().last().unwrap();
    assert_eq!(last.rule, "3");
    assert_eq!(last.columns, "Product");
    assert_eq!(last.components, "Boots");
}

/// Exported workbook has the Dashboard first and one sheet per group
#[test]
fn test_export_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(dir.path());

    let mut session = Session::load(&path).unwrap();
    session.generate(&ExpansionOptions::default()).unwrap();

    let written = session.export_to_dir(dir.path().join("output")).unwrap();
    let file_name = written.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("generated_keywords_"));
    assert!(file_name.ends_with(".xlsx"));

    let workbook = XlsxReader::read_file(&written).unwrap();
    let names: Vec<&str> = workbook.sheet_names().collect();
    assert_eq!(names, vec![DASHBOARD_SHEET, "Brand", "ungrouped"]);

    let brand = workbook.worksheet_by_name("Brand").unwrap();
    assert_eq!(brand.row_count(), 9);
    for (col, header) in KEYWORD_HEADERS.iter().enumerate() {
        assert_eq!(brand.get_value_at(0, col as u16).to_string(), *header);
    }
    assert_eq!(brand.get_value_at(1, 0), &CellValue::from("1,2"));
    assert_eq!(brand.get_value_at(1, 2), &CellValue::from("Match Type, Region"));
    assert_eq!(brand.get_value_at(1, 3), &CellValue::from("Exact North"));
    assert_eq!(brand.get_value_at(1, 4), &CellValue::from("Exact | North"));

    let dashboard = workbook.worksheet_by_name(DASHBOARD_SHEET).unwrap();
    assert_eq!(dashboard.get_value_at(0, 0), &CellValue::from("Item"));
    assert_eq!(dashboard.get_value_at(3, 0), &CellValue::from("Total keywords"));
    assert_eq!(dashboard.get_value_at(3, 1), &CellValue::from("12"));
    assert_eq!(dashboard.get_value_at(4, 1), &CellValue::Number(3.0));
}

/// In-memory export reads back like a file
#[test]
fn test_export_to_bytes() {
    let table = kwcombo::load_table_from_reader(
        Cursor::new(kwcombo::XlsxWriter::write_to_vec(&rules_workbook()).unwrap()),
        TableFormat::Xlsx,
    )
    .unwrap();

    let mut session = Session::from_table(table);
    assert!(matches!(
        session.export_to_bytes(),
        Err(ExportError::NothingGenerated)
    ));

    session.generate(&ExpansionOptions::default()).unwrap();
    let bytes = session.export_to_bytes().unwrap();
    let workbook = XlsxReader::read(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_count(), 3);
}

/// A failed generation leaves no stale results behind
#[test]
fn test_row_cap_clears_results() {
    let table = kwcombo::load_table_from_reader(
        Cursor::new(kwcombo::XlsxWriter::write_to_vec(&rules_workbook()).unwrap()),
        TableFormat::Xlsx,
    )
    .unwrap();

    let mut session = Session::from_table(table);
    session.generate(&ExpansionOptions::default()).unwrap();
    assert_eq!(session.rows().len(), 12);

    let result = session.generate(&ExpansionOptions::default().with_max_rows(8));
    assert!(matches!(
        result,
        Err(ExpansionError::RowLimitExceeded { ref rule, .. }) if rule == "2,3"
    ));
    assert!(session.rows().is_empty());
    assert!(matches!(
        session.export_to_dir(std::env::temp_dir()),
        Err(ExportError::NothingGenerated)
    ));
}

/// Preview filters by group and caps the row count
#[test]
fn test_preview() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::load(write_rules(dir.path())).unwrap();
    session.generate(&ExpansionOptions::default()).unwrap();

    assert_eq!(session.preview(&[], 100).len(), 12);
    assert_eq!(session.preview(&[], 5).len(), 5);

    let ungrouped = session.preview(&["ungrouped"], 100);
    assert_eq!(ungrouped.len(), 4);
    assert!(ungrouped.iter().all(|r| r.rule == "2,3"));

    assert!(session.preview(&["missing"], 10).is_empty());

    session.reset();
    assert!(session.preview(&[], 10).is_empty());
    assert_eq!(session.table().data_rows().len(), 3);
}

/// Groups and their sheets follow first appearance across interleaved rules
#[test]
fn test_groups_in_first_appearance_order() {
    let mut rows = vec![
        vec![
            CellValue::from("rule"),
            CellValue::from("group"),
            CellValue::from(1),
        ],
        vec!["rule".into(), "group".into(), "Code".into()],
    ];
    // 30 distinct rules over one column, groups cycling
    for i in 0..30 {
        let group = ["Zeta", "alpha", "x/y"][i % 3];
        rows.push(vec![
            CellValue::from(format!("1, v{}", i)),
            CellValue::from(group),
            CellValue::from(i),
        ]);
    }
    let table = RawTable::from_rows(rows).unwrap();

    let mut session = Session::from_table(table);
    session.generate(&ExpansionOptions::default()).unwrap();
    assert_eq!(session.rows().len(), 900);
    assert_eq!(session.groups(), vec!["Zeta", "alpha", "x/y"]);

    let sheets: Vec<(String, usize)> = session
        .group_sheets()
        .into_iter()
        .map(|s| (s.name, s.rows.len()))
        .collect();
    assert_eq!(
        sheets,
        vec![
            ("Zeta".to_string(), 300),
            ("alpha".to_string(), 300),
            ("x_y".to_string(), 300),
        ]
    );
}

/// The column catalog pairs labels with titles
#[test]
fn test_columns() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::load(write_rules(dir.path())).unwrap();

    let titles: Vec<String> = session.columns().into_iter().map(|c| c.title).collect();
    assert_eq!(titles, vec!["rule", "group", "Match Type", "Region", "Product"]);
}

/// CSV rule tables behave like their XLSX counterparts
#[cfg(feature = "csv")]
#[test]
fn test_csv_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.csv");
    std::fs::write(
        &path,
        "rule,group,1,2,3\nrule,group,Match Type,Region,Product\n\
         \"1,2\",Brand,Exact,North,Shoes\n\"2,3\",,Phrase,South,Boots\n3,Brand,Broad,,\n",
    )
    .unwrap();

    let mut session = Session::load(&path).unwrap();
    session.generate(&ExpansionOptions::default()).unwrap();
    assert_eq!(session.rows().len(), 12);
    assert_eq!(session.rows()[11].rule, "3");
}

/// Missing and unsupported inputs are load errors
#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        Session::load(dir.path().join("missing.xlsx")),
        Err(LoadError::NotFound(_))
    ));

    let garbage = dir.path().join("broken.xlsx");
    std::fs::write(&garbage, b"not a zip").unwrap();
    assert!(matches!(Session::load(&garbage), Err(LoadError::Xlsx(_))));
}

/// The sample template opens as a rule table
#[test]
fn test_template_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.xlsx");
    kwcombo::write_template(&path).unwrap();

    let workbook = Workbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_count(), 1);

    let mut session = Session::load(&path).unwrap();
    session.generate(&ExpansionOptions::default()).unwrap();
    assert!(!session.rows().is_empty());
}
