//! Dashboard statistics over a generated result set

use ahash::AHashMap;

use crate::expander::GeneratedKeyword;

/// Number of per-rule entries kept in a [`DashboardSummary`]
pub const TOP_RULES: usize = 15;

/// A name with its number of generated rows
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

impl CountEntry {
    /// Percentage of `total` this entry accounts for
    pub fn share(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 * 100.0 / total as f64
        }
    }
}

/// Descriptive statistics for the Dashboard sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardSummary {
    pub total_keywords: usize,
    /// Distinct rules with at least one row
    pub total_rules: usize,
    /// Distinct groups with at least one row
    pub total_groups: usize,
    /// Every group, most rows first
    pub group_counts: Vec<CountEntry>,
    /// The [`TOP_RULES`] rules with most rows, most rows first
    pub rule_counts: Vec<CountEntry>,
}

impl DashboardSummary {
    /// Percentage of all keywords that `entry` accounts for
    pub fn share(&self, entry: &CountEntry) -> f64 {
        entry.share(self.total_keywords)
    }

    /// The first `n` per-rule entries
    pub fn top_rules(&self, n: usize) -> &[CountEntry] {
        &self.rule_counts[..n.min(self.rule_counts.len())]
    }

    /// Row count of a group, 0 when absent
    pub fn group_count(&self, group: &str) -> usize {
        self.group_counts
            .iter()
            .find(|e| e.name == group)
            .map_or(0, |e| e.count)
    }
}

/// Compute the dashboard statistics for `rows`
///
/// Counts are sorted by descending count; ties keep the order in which the
/// names first appear in `rows`.
pub fn summarize(rows: &[GeneratedKeyword]) -> DashboardSummary {
    let group_counts = count_by(rows, |r| r.group.as_str());
    let mut rule_counts = count_by(rows, |r| r.rule.as_str());
    let total_rules = rule_counts.len();
    rule_counts.truncate(TOP_RULES);

    DashboardSummary {
        total_keywords: rows.len(),
        total_rules,
        total_groups: group_counts.len(),
        group_counts,
        rule_counts,
    }
}

fn count_by<'a, F>(rows: &'a [GeneratedKeyword], key: F) -> Vec<CountEntry>
where
    F: Fn(&'a GeneratedKeyword) -> &'a str,
{
    let mut positions: AHashMap<&str, usize> = AHashMap::new();
    let mut entries: Vec<CountEntry> = Vec::new();

    for row in rows {
        let name = key(row);
        match positions.get(name) {
            Some(&idx) => entries[idx].count += 1,
            None => {
                positions.insert(name, entries.len());
                entries.push(CountEntry {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
