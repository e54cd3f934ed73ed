//! A loaded rule table together with the results generated from it

use std::path::{Path, PathBuf};

use ahash::AHashSet;
use kwcombo_core::RawTable;
use kwcombo_engine::{
    aggregate_with, summarize, DashboardSummary, Expansion, ExpansionOptions, ExpansionResult,
    GeneratedKeyword,
};
use log::debug;

use crate::error::{ExportError, ExportResult, LoadResult};
use crate::exporter::{self, GroupSheet};
use crate::loader::{self, ColumnInfo};

/// Results of the last successful generation
#[derive(Debug, Clone)]
struct Generated {
    expansion: Expansion,
    summary: DashboardSummary,
}

/// One rule table and the keywords generated from it
///
/// Loading another table means creating another session, so results never
/// outlive the table they came from.
///
/// ```rust
/// use kwcombo::prelude::*;
///
/// let table = RawTable::from_rows(vec![
///     vec!["".into(), "".into(), CellValue::from(1)],
///     vec!["rule".into(), "group".into(), "Match Type".into()],
///     vec!["1".into(), "G1".into(), "Exact".into()],
/// ])
/// .unwrap();
///
/// let mut session = Session::from_table(table);
/// session.generate(&ExpansionOptions::default()).unwrap();
/// assert_eq!(session.rows().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    table: RawTable,
    generated: Option<Generated>,
}

impl Session {
    /// Load a rule table from a file
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        Ok(Self::from_table(loader::load_table(path)?))
    }

    /// Start a session for an already loaded table
    pub fn from_table(table: RawTable) -> Self {
        Self {
            table,
            generated: None,
        }
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    /// Labels and titles of the table's columns
    pub fn columns(&self) -> Vec<ColumnInfo> {
        loader::column_catalog(&self.table)
    }

    /// Expand the table, replacing any earlier results
    ///
    /// On error the session holds no results.
    pub fn generate(&mut self, options: &ExpansionOptions) -> ExpansionResult<&Expansion> {
        self.generated = None;

        let expansion = aggregate_with(&self.table, options)?;
        let summary = summarize(&expansion.rows);
        debug!(
            "Session holds {} keywords in {} groups",
            summary.total_keywords, summary.total_groups
        );

        let generated = self.generated.insert(Generated { expansion, summary });
        Ok(&generated.expansion)
    }

    /// Whether results are available
    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    pub fn expansion(&self) -> Option<&Expansion> {
        self.generated.as_ref().map(|g| &g.expansion)
    }

    /// Generated rows, empty before generation
    pub fn rows(&self) -> &[GeneratedKeyword] {
        self.generated
            .as_ref()
            .map_or(&[], |g| g.expansion.rows.as_slice())
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.generated.as_ref().map(|g| &g.summary)
    }

    /// Distinct groups in first-appearance order
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        self.rows()
            .iter()
            .map(|row| row.group.as_str())
            .filter(|group| seen.insert(*group))
            .collect()
    }

    /// Sheets the export writes after the Dashboard, see [`exporter::group_sheets`]
    pub fn group_sheets(&self) -> Vec<GroupSheet<'_>> {
        exporter::group_sheets(self.rows())
    }

    /// Up to `limit` rows belonging to any of `groups`, in result order
    ///
    /// An empty `groups` slice selects every group.
    pub fn preview<'a>(&'a self, groups: &[&str], limit: usize) -> Vec<&'a GeneratedKeyword> {
        self.rows()
            .iter()
            .filter(|r| groups.is_empty() || groups.contains(&r.group.as_str()))
            .take(limit)
            .collect()
    }

    /// Write the results into `dir`, see [`exporter::export_to_dir`]
    pub fn export_to_dir<P: AsRef<Path>>(&self, dir: P) -> ExportResult<PathBuf> {
        let generated = self.generated.as_ref().ok_or(ExportError::NothingGenerated)?;
        exporter::export_to_dir(&generated.expansion.rows, &generated.summary, dir)
    }

    /// Render the results as XLSX bytes
    pub fn export_to_bytes(&self) -> ExportResult<Vec<u8>> {
        let generated = self.generated.as_ref().ok_or(ExportError::NothingGenerated)?;
        exporter::export_to_bytes(&generated.expansion.rows, &generated.summary)
    }

    /// Discard the results, keeping the table
    pub fn reset(&mut self) {
        self.generated = None;
    }
}
