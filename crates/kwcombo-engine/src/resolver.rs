//! Column resolution: rule column references to value axes

use ahash::AHashSet;
use kwcombo_core::{CellValue, RawTable, LEADING_COLUMNS};
use log::debug;

use crate::error::ColumnGap;

/// One resolved category column
///
/// `values` holds the column's distinct non-blank values in first-occurrence
/// order and is never empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    /// Category title the axis was resolved through
    pub name: String,
    /// Distinct values, first occurrence first
    pub values: Vec<CellValue>,
}

impl Axis {
    /// Number of values on this axis
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for axes returned by [`resolve_column`]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolve a 1-based rule column reference to an axis
///
/// The title is taken from the title row at `column_ref + 1` (the title
/// row keeps the rule and group titles at indices 0 and 1). The data
/// column is then looked up by that title, so a repeated title always
/// resolves to its first column.
pub fn resolve_column(table: &RawTable, column_ref: usize) -> Result<Axis, ColumnGap> {
    let title = column_ref
        .checked_add(LEADING_COLUMNS - 1)
        .and_then(|index| table.title(index))
        .ok_or(ColumnGap::OutOfRange { column_ref })?;

    if title.is_blank() {
        return Err(ColumnGap::UntitledColumn { column_ref });
    }

    let name = title.to_string();
    let index = table
        .column_index(&name)
        .ok_or(ColumnGap::UntitledColumn { column_ref })?;

    let values = distinct_values(table.column_values(index));
    if values.is_empty() {
        return Err(ColumnGap::NoValues {
            column_ref,
            title: name,
        });
    }

    debug!(
        "Column {} resolved to '{}' with {} values",
        column_ref,
        name,
        values.len()
    );

    Ok(Axis { name, values })
}

/// Distinct non-blank values in first-occurrence order
///
/// Values are compared by type and content: the number `1` and the text
/// `"1"` are different values.
pub fn distinct_values<'a, I>(cells: I) -> Vec<CellValue>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut seen = AHashSet::new();
    let mut values = Vec::new();

    for cell in cells {
        if cell.is_blank() {
            continue;
        }
        if seen.insert(cell.distinct_key()) {
            values.push(cell.clone());
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> RawTable {
        RawTable::from_rows(vec![
            vec!["".into(), "".into(), CellValue::from(1), CellValue::from(2), CellValue::from(3)],
            vec![
                "rule".into(),
                "group".into(),
                "Match Type".into(),
                CellValue::Empty,
                "Match Type".into(),
            ],
            vec!["1".into(), "G1".into(), "Exact".into(), "x".into(), "Never".into()],
            vec!["1".into(), "G1".into(), "Phrase".into(), "y".into(), "Used".into()],
            vec!["2".into(), "G2".into(), "Exact".into(), "".into(), "".into()],
        ])
        .unwrap()
    }

    fn rendered(values: &[CellValue]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_empty_value_exclusion() {
        let cells: Vec<CellValue> = vec!["A".into(), "".into(), "  ".into(), "B".into(), "A".into()];
        assert_eq!(rendered(&distinct_values(&cells)), vec!["A", "B"]);
    }

    #[test]
    fn test_distinct_by_type() {
        let cells = vec![
            CellValue::from(1),
            CellValue::from("1"),
            CellValue::from(1.0),
            CellValue::Empty,
        ];
        assert_eq!(
            distinct_values(&cells),
            vec![CellValue::Number(1.0), CellValue::string("1")]
        );
    }

    #[test]
    fn test_resolve_offsets_by_leading_columns() {
        let axis = resolve_column(&table(), 1).unwrap();
        assert_eq!(axis.name, "Match Type");
        assert_eq!(rendered(&axis.values), vec!["Exact", "Phrase"]);
    }

    #[test]
    fn test_duplicate_title_resolves_to_first_column() {
        let axis = resolve_column(&table(), 3).unwrap();
        assert_eq!(rendered(&axis.values), vec!["Exact", "Phrase"]);
    }

    #[test]
    fn test_untitled_column() {
        assert_eq!(
            resolve_column(&table(), 2),
            Err(ColumnGap::UntitledColumn { column_ref: 2 })
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            resolve_column(&table(), 4),
            Err(ColumnGap::OutOfRange { column_ref: 4 })
        );
        assert_eq!(
            resolve_column(&table(), usize::MAX),
            Err(ColumnGap::OutOfRange { column_ref: usize::MAX })
        );
    }

    #[test]
    fn test_zero_refers_to_group_column() {
        let axis = resolve_column(&table(), 0).unwrap();
        assert_eq!(axis.name, "group");
        assert_eq!(rendered(&axis.values), vec!["G1", "G2"]);
    }

    #[test]
    fn test_column_without_values() {
        let table = RawTable::from_rows(vec![
            vec!["".into(), "".into(), CellValue::from(1)],
            vec!["rule".into(), "group".into(), "Region".into()],
            vec!["1".into(), "G1".into(), " ".into()],
        ])
        .unwrap();

        assert_eq!(
            resolve_column(&table, 1),
            Err(ColumnGap::NoValues {
                column_ref: 1,
                title: "Region".into()
            })
        );
    }
}
