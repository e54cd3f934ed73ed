//! Engine error types
//!
//! Only [`ExpansionError`] aborts a run. [`ColumnGap`] describes a column
//! reference that was skipped; it is recorded, never propagated.

use thiserror::Error;

/// Result type for expansion operations
pub type ExpansionResult<T> = std::result::Result<T, ExpansionError>;

/// Errors that abort an expansion run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// Expanding a rule would push the row count past the configured cap
    #[error("Expansion would exceed {limit} rows at rule '{rule}'")]
    RowLimitExceeded {
        rule: String,
        /// Row count including the offending rule, `None` on overflow
        expected: Option<usize>,
        limit: usize,
    },
}

/// Why a rule's column reference contributed no axis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnGap {
    /// The reference points past the last column
    #[error("column {column_ref} is beyond the last category column")]
    OutOfRange { column_ref: usize },

    /// The referenced column has a blank title
    #[error("column {column_ref} has no category title")]
    UntitledColumn { column_ref: usize },

    /// The referenced column has no non-blank values
    #[error("column {column_ref} ('{title}') has no values")]
    NoValues { column_ref: usize, title: String },
}

impl ColumnGap {
    /// The rule's column reference that could not be resolved
    pub fn column_ref(&self) -> usize {
        match self {
            ColumnGap::OutOfRange { column_ref }
            | ColumnGap::UntitledColumn { column_ref }
            | ColumnGap::NoValues { column_ref, .. } => *column_ref,
        }
    }
}
