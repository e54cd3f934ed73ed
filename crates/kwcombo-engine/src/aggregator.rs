//! Expansion of every rule in a table into one ordered result set

use kwcombo_core::RawTable;
use log::{debug, info, warn};

use crate::error::{ColumnGap, ExpansionError, ExpansionResult};
use crate::expander::{EmptyReason, GeneratedKeyword, RuleOutcome, RulePlan};
use crate::rule::{rule_groups, UNGROUPED};

/// Options for an expansion run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpansionOptions {
    /// Maximum number of rows the whole run may produce (None = unlimited)
    pub max_rows: Option<usize>,
    /// Group assigned to rules with a blank group cell
    pub ungrouped_label: String,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_rows: None,
            ungrouped_label: UNGROUPED.to_string(),
        }
    }
}

impl ExpansionOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the total number of generated rows
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Use a different group for rules without one
    pub fn with_ungrouped_label<S: Into<String>>(mut self, label: S) -> Self {
        self.ungrouped_label = label.into();
        self
    }
}

/// What happened to one mapped rule during a run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleReport {
    pub rule: String,
    pub group: String,
    /// Column references parsed from the rule
    pub column_refs: Vec<usize>,
    /// References that contributed no axis
    pub gaps: Vec<ColumnGap>,
    /// Rows produced
    pub rows: usize,
    /// Set when the rule produced nothing
    pub empty_reason: Option<EmptyReason>,
}

impl RuleReport {
    /// Whether some of the rule's references were dropped or it produced nothing
    pub fn is_degraded(&self) -> bool {
        self.empty_reason.is_some() || !self.gaps.is_empty()
    }
}

/// Result of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Generated rows, in rule order
    pub rows: Vec<GeneratedKeyword>,
    /// One report per mapped rule, in rule order
    pub reports: Vec<RuleReport>,
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Reports of rules that lost references or produced nothing
    pub fn degraded(&self) -> impl Iterator<Item = &RuleReport> {
        self.reports.iter().filter(|r| r.is_degraded())
    }

    pub fn into_rows(self) -> Vec<GeneratedKeyword> {
        self.rows
    }
}

/// Expand every rule of `table` with default options
///
/// Rules that produce nothing are skipped silently; use
/// [`aggregate_with`] to see what happened to each of them.
pub fn aggregate(table: &RawTable) -> Vec<GeneratedKeyword> {
    // Without a row cap the run cannot fail
    aggregate_with(table, &ExpansionOptions::default())
        .map(Expansion::into_rows)
        .unwrap_or_default()
}

/// Expand every rule of `table`
///
/// Rules are processed in the order of the rule → group mapping, each
/// distinct rule exactly once, and their rows are concatenated. The only
/// failure is exceeding `options.max_rows`, which aborts the run.
pub fn aggregate_with(table: &RawTable, options: &ExpansionOptions) -> ExpansionResult<Expansion> {
    let mapping = rule_groups(table, &options.ungrouped_label);
    debug!("Found {} distinct rules", mapping.len());

    let mut expansion = Expansion::default();

    for entry in &mapping {
        let plan = RulePlan::new(table, &entry.rule);

        if let Some(limit) = options.max_rows {
            let expected = plan
                .expected_rows()
                .and_then(|n| n.checked_add(expansion.rows.len()));
            if expected.map_or(true, |n| n > limit) {
                return Err(ExpansionError::RowLimitExceeded {
                    rule: entry.rule.clone(),
                    expected,
                    limit,
                });
            }
        }

        let outcome = plan.expand(&entry.rule, &entry.group, None)?;
        let report = RuleReport {
            rule: entry.rule.clone(),
            group: entry.group.clone(),
            column_refs: plan.column_refs,
            gaps: plan.gaps,
            rows: outcome.rows().len(),
            empty_reason: match &outcome {
                RuleOutcome::Empty(reason) => Some(*reason),
                RuleOutcome::Expanded(_) => None,
            },
        };

        match report.empty_reason {
            Some(reason) => warn!("Rule '{}' produced no keywords: {:?}", report.rule, reason),
            None if !report.gaps.is_empty() => warn!(
                "Rule '{}' skipped {} of {} columns",
                report.rule,
                report.gaps.len(),
                report.column_refs.len()
            ),
            None => debug!("Rule '{}' produced {} keywords", report.rule, report.rows),
        }

        expansion.rows.extend(outcome.into_rows());
        expansion.reports.push(report);
    }

    info!(
        "Generated {} keywords from {} rules",
        expansion.rows.len(),
        expansion.reports.len()
    );

    Ok(expansion)
}
