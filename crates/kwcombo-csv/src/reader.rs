//! CSV reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use kwcombo_core::{CellValue, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read CSV file into a worksheet
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), options)
    }

    /// Read CSV from a reader into a worksheet
    ///
    /// There is no header handling: the first record is row 0. Records may
    /// have different lengths. Text is kept exactly as written unless
    /// `detect_numbers` is set, and empty fields become [`CellValue::Empty`].
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(options.sheet_name.as_str());

        for result in csv_reader.records() {
            let record = result?;
            worksheet.push_row(record.iter().map(|field| Self::field_value(field, options)))?;
        }

        debug!("Read {} CSV records", worksheet.row_count());
        Ok(worksheet)
    }

    fn field_value(field: &str, options: &CsvReadOptions) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }

        if options.detect_numbers && is_plain_number(field) {
            match field.parse::<f64>() {
                Ok(n) if n.is_finite() => return CellValue::Number(n),
                _ => {}
            }
        }

        CellValue::string(field)
    }
}

/// Optional sign, digits, optional fraction; nothing else
///
/// Exponents, `inf`, `nan` and surrounding spaces stay text.
fn is_plain_number(field: &str) -> bool {
    let digits = field.strip_prefix(['-', '+']).unwrap_or(field);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match frac_part {
        None => !int_part.is_empty() && all_digits(int_part),
        Some(f) => {
            (!int_part.is_empty() || !f.is_empty()) && all_digits(int_part) && all_digits(f)
        }
    }
}
