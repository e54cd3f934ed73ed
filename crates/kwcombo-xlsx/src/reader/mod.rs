//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use kwcombo_core::{CellAddress, CellError, CellValue, SharedString, Workbook, Worksheet};

/// A sheet listed in `xl/workbook.xml`
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read every worksheet of a workbook
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheets = Self::read_sheet_entries(&mut archive)?;

        let mut workbook = Workbook::new();
        for entry in &sheets {
            let mut worksheet = Worksheet::new(entry.name.as_str());
            Self::read_worksheet(&mut archive, &entry.path, &mut worksheet, &shared_strings)?;
            workbook.add_existing_worksheet(worksheet)?;
        }

        Ok(workbook)
    }

    /// Read only the first worksheet, in workbook order
    ///
    /// Fails with [`XlsxError::NoWorksheets`] when the workbook lists none.
    pub fn read_first_sheet<R: Read + Seek>(reader: R) -> XlsxResult<Worksheet> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let entry = Self::read_sheet_entries(&mut archive)?
            .into_iter()
            .next()
            .ok_or(XlsxError::NoWorksheets)?;

        debug!("Reading worksheet '{}' from {}", entry.name, entry.path);
        let mut worksheet = Worksheet::new(entry.name.as_str());
        Self::read_worksheet(&mut archive, &entry.path, &mut worksheet, &shared_strings)?;
        Ok(worksheet)
    }

    fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<zip::ZipArchive<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Sheets in workbook order, with their part paths resolved
    fn read_sheet_entries<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetEntry>> {
        let sheet_info = Self::read_workbook_xml(archive)?;
        let sheet_paths = Self::read_workbook_rels(archive)?;

        Ok(sheet_info
            .into_iter()
            .filter_map(|(name, r_id)| {
                sheet_paths
                    .get(&r_id)
                    .map(|path| SheetEntry {
                        name,
                        path: path.clone(),
                    })
            })
            .collect())
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Keep leading/trailing spaces of string items
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs repeat the text and must not be appended
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(SharedString::new(""));
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(SharedString::new(decode_excel_escapes(&current_string)));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        debug!("Read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cell values of a worksheet part
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[SharedString],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();

        // Position of the next row/cell when `r` attributes are omitted
        let mut next_row: u32 = 0;
        let mut next_col: u16 = 0;

        // Current cell state
        let mut current_addr: Option<CellAddress> = None;
        let mut current_cell_type: Option<String> = None;
        let mut current_value: Option<String> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        next_row = Self::row_index(&e, next_row)?;
                        next_col = 0;
                    }
                    b"c" => {
                        let addr = Self::cell_address(&e, next_row, next_col)?;
                        next_col = addr.col.saturating_add(1);
                        current_addr = Some(addr);
                        current_cell_type = attr_value(&e, b"t");
                        current_value = None;
                    }
                    b"v" if current_addr.is_some() => in_value = true,
                    b"is" if current_addr.is_some() => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        // Self-closing <row/> holds no cells but still takes a position
                        next_row = Self::row_index(&e, next_row)?.saturating_add(1);
                        next_col = 0;
                    }
                    b"c" => {
                        let addr = Self::cell_address(&e, next_row, next_col)?;
                        next_col = addr.col.saturating_add(1);
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(addr) = current_addr.take() {
                            if let Some(value) = Self::parse_cell_value(
                                current_cell_type.as_deref(),
                                current_value.take(),
                                shared_strings,
                            )? {
                                worksheet.set_value_at(addr.row, addr.col, value)?;
                            }
                        }
                    }
                    b"row" => {
                        next_row = next_row.saturating_add(1);
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    let text = e.unescape()?;
                    current_value.get_or_insert_with(String::new).push_str(&text);
                    if in_inline_text {
                        current_cell_type = Some("inlineStr".to_string());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// 0-based index of a `<row>` element
    fn row_index(e: &BytesStart, default: u32) -> XlsxResult<u32> {
        match attr_value(e, b"r") {
            Some(r) => r
                .parse::<u32>()
                .map(|r| r.saturating_sub(1)) // 1-based to 0-based
                .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r))),
            None => Ok(default),
        }
    }

    /// Address of a `<c>` element, falling back to the running position
    fn cell_address(e: &BytesStart, row: u32, col: u16) -> XlsxResult<CellAddress> {
        match attr_value(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|e| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
            }),
            None => Ok(CellAddress::new(row, col)),
        }
    }

    /// Convert the raw text of a cell into a value
    ///
    /// Formula cells are read through their cached result; a cell with no
    /// value yields `None`.
    fn parse_cell_value(
        cell_type: Option<&str>,
        value: Option<String>,
        shared_strings: &[SharedString],
    ) -> XlsxResult<Option<CellValue>> {
        let value = match value {
            Some(v) => v,
            None => return Ok(None),
        };

        let cell_value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Error
            Some("e") => CellError::parse(&value)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // Inline string or formula string result
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(&value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            // ISO dates and unknown types are kept as text
            Some(_) => CellValue::string(value),
        };

        Ok(Some(cell_value))
    }
}

/// Unescaped value of an attribute, if present
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}
