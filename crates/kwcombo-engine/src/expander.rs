//! Cartesian expansion of one rule into keyword rows

use itertools::Itertools;
use kwcombo_core::RawTable;
use log::debug;

use crate::aggregator::ExpansionOptions;
use crate::error::{ColumnGap, ExpansionError, ExpansionResult};
use crate::resolver::{resolve_column, Axis};
use crate::rule::parse_rule_str;

/// Separator between the values of a keyword
pub const KEYWORD_SEPARATOR: &str = " ";

/// Separator between the values of the component breakdown
pub const COMPONENT_SEPARATOR: &str = " | ";

/// Separator between the axis names of the `columns` field
pub const COLUMN_SEPARATOR: &str = ", ";

/// One generated result row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedKeyword {
    pub rule: String,
    pub group: String,
    /// Axis names, comma-joined
    pub columns: String,
    /// Values, space-joined
    pub keyword: String,
    /// Values, pipe-joined
    pub components: String,
}

/// Why a rule produced no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyReason {
    /// The rule cell holds no usable column reference
    NoColumnRefs,
    /// None of the referenced columns resolved to an axis
    NoResolvableColumns,
}

/// Result of expanding a single rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Expanded(Vec<GeneratedKeyword>),
    Empty(EmptyReason),
}

impl RuleOutcome {
    /// Rows produced, empty for [`RuleOutcome::Empty`]
    pub fn rows(&self) -> &[GeneratedKeyword] {
        match self {
            RuleOutcome::Expanded(rows) => rows,
            RuleOutcome::Empty(_) => &[],
        }
    }

    pub fn into_rows(self) -> Vec<GeneratedKeyword> {
        match self {
            RuleOutcome::Expanded(rows) => rows,
            RuleOutcome::Empty(_) => Vec::new(),
        }
    }
}

/// A rule's parsed references and the axes they resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct RulePlan {
    pub column_refs: Vec<usize>,
    pub axes: Vec<Axis>,
    pub gaps: Vec<ColumnGap>,
}

impl RulePlan {
    /// Parse `rule` and resolve each reference against `table`
    ///
    /// References that cannot be resolved are recorded as gaps and drop
    /// out of the product.
    pub fn new(table: &RawTable, rule: &str) -> Self {
        let column_refs = parse_rule_str(rule);
        let mut axes = Vec::with_capacity(column_refs.len());
        let mut gaps = Vec::new();

        for &column_ref in &column_refs {
            match resolve_column(table, column_ref) {
                Ok(axis) => axes.push(axis),
                Err(gap) => {
                    debug!("Rule '{}': {}", rule, gap);
                    gaps.push(gap);
                }
            }
        }

        Self {
            column_refs,
            axes,
            gaps,
        }
    }

    /// Reason this plan yields nothing, if it does
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if self.column_refs.is_empty() {
            Some(EmptyReason::NoColumnRefs)
        } else if self.axes.is_empty() {
            Some(EmptyReason::NoResolvableColumns)
        } else {
            None
        }
    }

    /// Number of rows the product will have, `None` on overflow
    pub fn expected_rows(&self) -> Option<usize> {
        expected_rows(&self.axes)
    }

    /// Expand the plan, refusing to produce more than `limit` rows
    pub fn expand(&self, rule: &str, group: &str, limit: Option<usize>) -> ExpansionResult<RuleOutcome> {
        if let Some(reason) = self.empty_reason() {
            return Ok(RuleOutcome::Empty(reason));
        }

        if let Some(limit) = limit {
            let expected = self.expected_rows();
            if expected.map_or(true, |n| n > limit) {
                return Err(ExpansionError::RowLimitExceeded {
                    rule: rule.to_string(),
                    expected,
                    limit,
                });
            }
        }

        Ok(RuleOutcome::Expanded(expand(rule, group, &self.axes)))
    }
}

/// Product of the axis sizes, `None` on overflow
pub fn expected_rows(axes: &[Axis]) -> Option<usize> {
    if axes.is_empty() {
        return Some(0);
    }
    axes.iter().try_fold(1usize, |acc, axis| acc.checked_mul(axis.len()))
}

/// Expand the Cartesian product of `axes` into keyword rows
///
/// The first axis varies slowest and the last fastest. No axes means no
/// rows.
///
/// # Example
/// ```rust
/// use kwcombo_core::CellValue;
/// use kwcombo_engine::{expand, Axis};
///
/// let axes = vec![
///     Axis { name: "Brand".into(), values: vec!["acme".into()] },
///     Axis { name: "Product".into(), values: vec!["shoes".into(), "boots".into()] },
/// ];
/// let rows = expand("1,2", "G1", &axes);
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].keyword, "acme boots");
/// assert_eq!(rows[1].components, "acme | boots");
/// assert_eq!(rows[1].columns, "Brand, Product");
/// ```
pub fn expand(rule: &str, group: &str, axes: &[Axis]) -> Vec<GeneratedKeyword> {
    if axes.is_empty() {
        return Vec::new();
    }

    let columns = axes.iter().map(|axis| axis.name.as_str()).join(COLUMN_SEPARATOR);
    let rendered: Vec<Vec<String>> = axes
        .iter()
        .map(|axis| axis.values.iter().map(ToString::to_string).collect())
        .collect();

    rendered
        .iter()
        .map(|values| values.iter())
        .multi_cartesian_product()
        .map(|combo| GeneratedKeyword {
            rule: rule.to_string(),
            group: group.to_string(),
            columns: columns.clone(),
            keyword: combo.iter().join(KEYWORD_SEPARATOR),
            components: combo.iter().join(COMPONENT_SEPARATOR),
        })
        .collect()
}

/// Parse, resolve and expand a single rule
///
/// Rules that cannot produce anything come back as [`RuleOutcome::Empty`];
/// only the row cap in `options` makes this fail.
pub fn expand_rule(
    table: &RawTable,
    rule: &str,
    group: &str,
    options: &ExpansionOptions,
) -> ExpansionResult<RuleOutcome> {
    RulePlan::new(table, rule).expand(rule, group, options.max_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwcombo_core::CellValue;
    use pretty_assertions::assert_eq;

    fn axis(name: &str, values: &[&str]) -> Axis {
        Axis {
            name: name.to_string(),
            values: values.iter().map(|v| CellValue::from(*v)).collect(),
        }
    }

    fn table() -> RawTable {
        RawTable::from_rows(vec![
            vec!["".into(), "".into(), CellValue::from(1), CellValue::from(2)],
            vec!["rule".into(), "group".into(), "Match Type".into(), "Keyword Type".into()],
            vec!["1".into(), "G1".into(), "Exact".into(), "Brand".into()],
            vec!["1".into(), "G1".into(), "Phrase".into(), "Generic".into()],
        ])
        .unwrap()
    }

    #[test]
    fn test_expand_order() {
        let rows = expand("1,2", "G", &[axis("A", &["a1", "a2"]), axis("B", &["b1", "b2", "b3"])]);
        let keywords: Vec<_> = rows.iter().map(|r| r.keyword.as_str()).collect();

        assert_eq!(
            keywords,
            vec!["a1 b1", "a1 b2", "a1 b3", "a2 b1", "a2 b2", "a2 b3"]
        );
    }

    #[test]
    fn test_expand_no_axes() {
        assert!(expand("1", "G", &[]).is_empty());
    }

    #[test]
    fn test_numbers_render_naturally() {
        let axes = vec![Axis {
            name: "Size".into(),
            values: vec![CellValue::from(42), CellValue::from(2.5)],
        }];
        let rows = expand("1", "G", &axes);

        assert_eq!(rows[0].keyword, "42");
        assert_eq!(rows[1].keyword, "2.5");
    }

    #[test]
    fn test_expand_rule_single_axis() {
        let outcome = expand_rule(&table(), "1", "G1", &ExpansionOptions::default()).unwrap();

        assert_eq!(
            outcome.rows(),
            &[
                GeneratedKeyword {
                    rule: "1".into(),
                    group: "G1".into(),
                    columns: "Match Type".into(),
                    keyword: "Exact".into(),
                    components: "Exact".into(),
                },
                GeneratedKeyword {
                    rule: "1".into(),
                    group: "G1".into(),
                    columns: "Match Type".into(),
                    keyword: "Phrase".into(),
                    components: "Phrase".into(),
                },
            ]
        );
    }

    #[test]
    fn test_expand_rule_skips_missing_axis() {
        let outcome = expand_rule(&table(), "9, 2", "G1", &ExpansionOptions::default()).unwrap();
        let keywords: Vec<_> = outcome.rows().iter().map(|r| r.keyword.as_str()).collect();

        assert_eq!(keywords, vec!["Brand", "Generic"]);
        assert_eq!(outcome.rows()[0].columns, "Keyword Type");
    }

    #[test]
    fn test_expand_rule_empty_reasons() {
        let options = ExpansionOptions::default();

        assert_eq!(
            expand_rule(&table(), "abc", "G1", &options).unwrap(),
            RuleOutcome::Empty(EmptyReason::NoColumnRefs)
        );
        assert_eq!(
            expand_rule(&table(), "9", "G1", &options).unwrap(),
            RuleOutcome::Empty(EmptyReason::NoResolvableColumns)
        );
    }

    #[test]
    fn test_row_limit() {
        let options = ExpansionOptions {
            max_rows: Some(4),
            ..Default::default()
        };

        assert!(expand_rule(&table(), "1,2", "G1", &options).is_ok());

        let err = expand_rule(&table(), "1,2,1", "G1", &options).unwrap_err();
        assert_eq!(
            err,
            ExpansionError::RowLimitExceeded {
                rule: "1,2,1".into(),
                expected: Some(8),
                limit: 4,
            }
        );
    }

    #[test]
    fn test_expected_rows_overflow() {
        let wide = Axis {
            name: "N".into(),
            values: (0..1024).map(CellValue::from).collect(),
        };
        let axes = vec![wide; 8];

        assert_eq!(expected_rows(&axes), None);
        assert_eq!(expected_rows(&axes[..2]), Some(1024 * 1024));
        assert_eq!(expected_rows(&[]), Some(0));
    }
}
