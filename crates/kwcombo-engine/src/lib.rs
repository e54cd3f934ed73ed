//! # kwcombo-engine
//!
//! Turns a [`RawTable`](kwcombo_core::RawTable) of generation rules into
//! keyword rows.
//!
//! Each data row carries a rule (a comma-separated list of 1-based category
//! column references) and a group. For every distinct rule the referenced
//! columns are resolved to their distinct values and the Cartesian product
//! of those values becomes one [`GeneratedKeyword`] per combination.
//!
//! ```rust
//! use kwcombo_core::{CellValue, RawTable};
//! use kwcombo_engine::{aggregate, summarize};
//!
//! let table = RawTable::from_rows(vec![
//!     vec!["".into(), "".into(), CellValue::from(1), CellValue::from(2)],
//!     vec!["rule".into(), "group".into(), "Brand".into(), "Product".into()],
//!     vec!["1,2".into(), "Core".into(), "acme".into(), "shoes".into()],
//!     vec!["1,2".into(), "Core".into(), "zenith".into(), "boots".into()],
//! ])
//! .unwrap();
//!
//! let rows = aggregate(&table);
//! assert_eq!(rows.len(), 4);
//! assert_eq!(rows[0].keyword, "acme shoes");
//!
//! let summary = summarize(&rows);
//! assert_eq!(summary.total_groups, 1);
//! ```
//!
//! Rules that reference nothing usable produce no rows and never fail the
//! run; [`aggregate_with`] returns a [`RuleReport`] per rule describing what
//! was skipped.

pub mod aggregator;
pub mod error;
pub mod expander;
pub mod resolver;
pub mod rule;
pub mod summary;

pub use aggregator::{aggregate, aggregate_with, Expansion, ExpansionOptions, RuleReport};
pub use error::{ColumnGap, ExpansionError, ExpansionResult};
pub use expander::{
    expand, expand_rule, expected_rows, EmptyReason, GeneratedKeyword, RuleOutcome, RulePlan,
};
pub use resolver::{distinct_values, resolve_column, Axis};
pub use rule::{parse_rule, parse_rule_str, rule_groups, RuleGroup, UNGROUPED};
pub use summary::{summarize, CountEntry, DashboardSummary, TOP_RULES};
