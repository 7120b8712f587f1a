//! Aggregation result types and errors

use crate::table::CleanedTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that isolate a single aggregation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("{0} is undefined on empty input")]
    EmptyInput(&'static str),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Result type for aggregations
pub type QueryResult<T> = Result<T, QueryError>;

/// Fail with `ColumnNotFound` unless every column exists
pub(crate) fn require_columns(table: &CleanedTable, names: &[&str]) -> QueryResult<()> {
    match names.iter().find(|n| !table.has_column(n)) {
        Some(missing) => Err(QueryError::ColumnNotFound(missing.to_string())),
        None => Ok(()),
    }
}

/// One ranked leaderboard line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: usize,
    pub key: String,
    pub value: u64,
}

/// Top-N list sorted by value descending, then key ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank `(key, count)` pairs deterministically and keep the top `n`
    pub fn from_counts(counts: impl IntoIterator<Item = (String, u64)>, n: usize) -> Self {
        let mut pairs: Vec<(String, u64)> = counts.into_iter().collect();
        sort_counts(&mut pairs);
        pairs.truncate(n);
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (key, value))| LeaderboardEntry {
                rank: i + 1,
                key,
                value,
            })
            .collect();
        Self { entries }
    }

    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.value)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Sort by count descending, ties by key ascending
pub(crate) fn sort_counts(pairs: &mut [(String, u64)]) {
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

/// Row counts per category of one column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedCounts {
    pub column: String,
    /// `(category, count)`, count descending then category ascending
    pub groups: Vec<(String, u64)>,
}

impl GroupedCounts {
    pub fn total(&self) -> u64 {
        self.groups.iter().map(|(_, c)| c).sum()
    }

    pub fn get(&self, key: &str) -> u64 {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Percentage of the total per category, same order; empty when the
    /// total is zero
    pub fn proportions(&self) -> Vec<(String, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.groups
            .iter()
            .map(|(k, c)| (k.clone(), *c as f64 * 100.0 / total as f64))
            .collect()
    }
}

/// Square or rectangular matrix of optional numbers; `None` marks a cell
/// that is undefined (e.g. correlation with a constant column)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Matrix {
    pub fn square(labels: Vec<String>, cells: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            row_labels: labels.clone(),
            column_labels: labels,
            cells,
        }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        self.cells.get(r)?.get(c).copied().flatten()
    }
}

/// Tagged result of one aggregation; always an owned snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AggregationResult {
    Scalar(f64),
    Leaderboard(Leaderboard),
    Grouped(GroupedCounts),
    Matrix(Matrix),
}

impl From<Leaderboard> for AggregationResult {
    fn from(value: Leaderboard) -> Self {
        AggregationResult::Leaderboard(value)
    }
}

impl From<GroupedCounts> for AggregationResult {
    fn from(value: GroupedCounts) -> Self {
        AggregationResult::Grouped(value)
    }
}

impl From<Matrix> for AggregationResult {
    fn from(value: Matrix) -> Self {
        AggregationResult::Matrix(value)
    }
}
