//! Rule parsing and the rule → group mapping

use ahash::AHashMap;
use kwcombo_core::{CellValue, RawTable, GROUP_COLUMN, RULE_COLUMN};
use log::debug;

/// Group assigned to rules whose group cell is blank
pub const UNGROUPED: &str = "ungrouped";

/// Parse a rule cell into its 1-based column references
///
/// The cell is rendered to text and split on `,`. Tokens are trimmed and
/// kept only when they consist solely of ASCII digits; everything else is
/// skipped. Order and duplicates are preserved. An empty cell, or a token
/// too large to represent, yields an empty list.
///
/// # Example
/// ```rust
/// use kwcombo_core::CellValue;
/// use kwcombo_engine::parse_rule;
///
/// assert_eq!(parse_rule(&CellValue::from("2, x, 3")), vec![2, 3]);
/// assert_eq!(parse_rule(&CellValue::from(4)), vec![4]);
/// assert!(parse_rule(&CellValue::Empty).is_empty());
/// ```
pub fn parse_rule(cell: &CellValue) -> Vec<usize> {
    if cell.is_empty() {
        return Vec::new();
    }
    parse_rule_str(&cell.to_string())
}

/// Parse an already rendered rule string, see [`parse_rule`]
pub fn parse_rule_str(rule: &str) -> Vec<usize> {
    let mut refs = Vec::new();

    for token in rule.split(',').map(str::trim) {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        match token.parse::<usize>() {
            Ok(n) => refs.push(n),
            Err(e) => {
                debug!("Rule '{}': token '{}' not usable ({}), rule ignored", rule, token, e);
                return Vec::new();
            }
        }
    }

    refs
}

/// One entry of the rule → group mapping
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleGroup {
    /// Rule cell rendered as text
    pub rule: String,
    /// Group the rule's keywords are filed under
    pub group: String,
}

/// Build the rule → group mapping from the table's data rows
///
/// Rows with a blank rule cell are skipped. Each distinct rule string
/// appears once, at the position of its first occurrence; when a rule
/// repeats, the group of its last occurrence wins. A blank group cell maps
/// to `ungrouped_label`.
pub fn rule_groups(table: &RawTable, ungrouped_label: &str) -> Vec<RuleGroup> {
    let mut mapping: Vec<RuleGroup> = Vec::new();
    let mut positions: AHashMap<String, usize> = AHashMap::new();

    for row in table.data_rows() {
        let rule_cell = &row[RULE_COLUMN];
        if rule_cell.is_blank() {
            continue;
        }

        let rule = rule_cell.to_string();
        let group = match row.get(GROUP_COLUMN) {
            Some(cell) if !cell.is_blank() => cell.to_string(),
            _ => ungrouped_label.to_string(),
        };

        match positions.get(&rule) {
            Some(&idx) => {
                if mapping[idx].group != group {
                    debug!(
                        "Rule '{}' regrouped from '{}' to '{}'",
                        rule, mapping[idx].group, group
                    );
                }
                mapping[idx].group = group;
            }
            None => {
                positions.insert(rule.clone(), mapping.len());
                mapping.push(RuleGroup { rule, group });
            }
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rows: Vec<Vec<CellValue>>) -> RawTable {
        let mut grid = vec![
            vec!["".into(), "".into(), CellValue::from(1)],
            vec!["rule".into(), "group".into(), "Match Type".into()],
        ];
        grid.extend(rows);
        RawTable::from_rows(grid).unwrap()
    }

    fn mapping(table: &RawTable) -> Vec<(String, String)> {
        rule_groups(table, UNGROUPED)
            .into_iter()
            .map(|m| (m.rule, m.group))
            .collect()
    }

    #[test]
    fn test_parse_rule_basic() {
        assert_eq!(parse_rule_str("2,3"), vec![2, 3]);
        assert_eq!(parse_rule_str("2, x, 3"), vec![2, 3]);
        assert_eq!(parse_rule_str(" 3 ,1,3"), vec![3, 1, 3]);
    }

    #[test]
    fn test_parse_rule_rejects_non_digits() {
        assert!(parse_rule_str("").is_empty());
        assert!(parse_rule_str("abc").is_empty());
        assert!(parse_rule_str("-1,+2").is_empty());
        assert!(parse_rule_str("1.5").is_empty());
        assert!(parse_rule_str(",,").is_empty());
    }

    #[test]
    fn test_parse_rule_overflow_discards_everything() {
        assert!(parse_rule_str("1,99999999999999999999999999").is_empty());
    }

    #[test]
    fn test_parse_rule_cells() {
        assert!(parse_rule(&CellValue::Empty).is_empty());
        assert_eq!(parse_rule(&CellValue::Number(2.0)), vec![2]);
        assert!(parse_rule(&CellValue::Number(2.5)).is_empty());
        assert!(parse_rule(&CellValue::Boolean(true)).is_empty());
    }

    #[test]
    fn test_ungrouped_default() {
        let t = table(vec![
            vec!["1".into(), CellValue::Empty, "Exact".into()],
            vec!["2".into(), "   ".into(), "Phrase".into()],
        ]);

        assert_eq!(
            mapping(&t),
            vec![
                ("1".to_string(), "ungrouped".to_string()),
                ("2".to_string(), "ungrouped".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_group_wins_first_position_kept() {
        let t = table(vec![
            vec!["1".into(), "A".into(), "Exact".into()],
            vec!["2".into(), "B".into(), "Phrase".into()],
            vec!["1".into(), "C".into(), "Broad".into()],
        ]);

        assert_eq!(
            mapping(&t),
            vec![
                ("1".to_string(), "C".to_string()),
                ("2".to_string(), "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_rule_rows_are_skipped() {
        let t = table(vec![
            vec![CellValue::Empty, "A".into(), "Exact".into()],
            vec!["  ".into(), "A".into(), "Phrase".into()],
            vec![CellValue::from(3), CellValue::from(7), "Broad".into()],
        ]);

        assert_eq!(mapping(&t), vec![("3".to_string(), "7".to_string())]);
    }
}
