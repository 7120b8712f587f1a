//! Row filtering and consistency checking
//!
//! Filters run in a fixed order, which is part of the contract because the
//! reported removal counts depend on it:
//!
//! 1. banned-marker removal
//! 2. exact-duplicate row removal (optional)
//! 3. minimum word count (optional)
//!
//! A row failing any filter is dropped whole. Surviving rows keep their
//! original order and ids. Consistency checks never remove rows.

mod banned;
mod consistency;
mod duplicates;
mod min_words;

pub use banned::BannedSubstring;
pub use consistency::{check_consistency, ConsistencyCheck, ConsistencyFinding, ObservationPoint};
pub use duplicates::drop_exact_duplicates;
pub use min_words::MinWords;

use crate::table::{CleanedTable, DerivedTable};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which filters run, with their parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// Marker removed case-insensitively; `None` disables the filter
    pub banned_marker: Option<String>,
    pub drop_duplicate_rows: bool,
    /// Minimum `word_count`; `None` disables the filter
    pub min_words: Option<usize>,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            banned_marker: Some("trava-zaps".to_string()),
            drop_duplicate_rows: true,
            min_words: Some(5),
        }
    }
}

impl FilterPolicy {
    /// Only the banned-marker filter
    pub fn banned_only(marker: impl Into<String>) -> Self {
        Self {
            banned_marker: Some(marker.into()),
            drop_duplicate_rows: false,
            min_words: None,
        }
    }

    /// Apply the policy, consuming the derived table
    pub fn apply(&self, table: DerivedTable) -> (CleanedTable, FilterReport) {
        let (raw_columns, rows) = table.into_parts();
        let mut report = FilterReport {
            input_rows: rows.len(),
            ..Default::default()
        };

        let rows = match &self.banned_marker {
            Some(marker) => {
                let (kept, removed) = BannedSubstring::new(marker).apply(rows);
                report.banned_removed = Some(removed);
                kept
            }
            None => rows,
        };

        let rows = if self.drop_duplicate_rows {
            let (kept, removed) = drop_exact_duplicates(rows);
            report.duplicates_removed = Some(removed);
            kept
        } else {
            rows
        };

        let rows = match self.min_words {
            Some(min) => {
                let (kept, removed) = MinWords(min).apply(rows);
                report.short_removed = Some(removed);
                kept
            }
            None => rows,
        };

        report.output_rows = rows.len();
        info!(
            input = report.input_rows,
            output = report.output_rows,
            banned = report.banned_removed,
            duplicates = report.duplicates_removed,
            short = report.short_removed,
            "applied filter policy"
        );

        (CleanedTable::new(raw_columns, rows), report)
    }
}

/// Removal counts per filter; `None` when the filter did not run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    pub input_rows: usize,
    pub banned_removed: Option<usize>,
    pub duplicates_removed: Option<usize>,
    pub short_removed: Option<usize>,
    pub output_rows: usize,
}
