//! Band classification of misinformation scores

use super::types::{require_columns, sort_counts, GroupedCounts, Matrix, QueryResult};
use crate::table::{columns, CleanedTable, DerivedRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Category of a misinformation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MisinformationCategory {
    Misinformation,
    NotMisinformation,
    Neutral,
    Unknown,
}

impl MisinformationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MisinformationCategory::Misinformation => "Misinformation",
            MisinformationCategory::NotMisinformation => "Not Misinformation",
            MisinformationCategory::Neutral => "Neutral",
            MisinformationCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for MisinformationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score thresholds.
///
/// A score above `upper` is misinformation, below `lower` is not, and
/// anything in `[lower, upper]` is neutral. With the default `0.5 / 0.5`
/// only a score of exactly 0.5 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MisinformationBands {
    pub upper: f64,
    pub lower: f64,
}

impl Default for MisinformationBands {
    fn default() -> Self {
        Self {
            upper: 0.5,
            lower: 0.5,
        }
    }
}

impl MisinformationBands {
    pub fn classify(&self, score: Option<f64>) -> MisinformationCategory {
        match score {
            None => MisinformationCategory::Unknown,
            Some(s) if s.is_nan() => MisinformationCategory::Unknown,
            Some(s) if s > self.upper => MisinformationCategory::Misinformation,
            Some(s) if s < self.lower => MisinformationCategory::NotMisinformation,
            Some(_) => MisinformationCategory::Neutral,
        }
    }

    pub fn classify_row(&self, row: &DerivedRow) -> MisinformationCategory {
        self.classify(row.row.get(columns::SCORE_MISINFORMATION).as_f64())
    }
}

/// Rows per misinformation category; categories with no rows are omitted
pub fn misinformation_counts(table: &CleanedTable, bands: &MisinformationBands) -> QueryResult<GroupedCounts> {
    require_columns(table, &[columns::SCORE_MISINFORMATION])?;
    let mut counts: HashMap<MisinformationCategory, u64> = HashMap::new();
    for row in table.rows() {
        *counts.entry(bands.classify_row(row)).or_insert(0) += 1;
    }
    let mut groups: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(k, v)| (k.as_str().to_string(), v))
        .collect();
    sort_counts(&mut groups);
    Ok(GroupedCounts {
        column: "misinformation_category".to_string(),
        groups,
    })
}

/// Counts of `column` values (rows) against misinformation categories
/// (columns). Rows with a null `column` cell are skipped.
pub fn misinformation_crosstab(table: &CleanedTable, column: &str, bands: &MisinformationBands) -> QueryResult<Matrix> {
    require_columns(table, &[column, columns::SCORE_MISINFORMATION])?;
    let mut counts: HashMap<(String, MisinformationCategory), u64> = HashMap::new();
    let mut row_labels = BTreeSet::new();
    let mut categories = BTreeSet::new();
    for row in table.rows() {
        let Some(key) = row.value(column).key() else {
            continue;
        };
        let category = bands.classify_row(row);
        row_labels.insert(key.clone());
        categories.insert(category);
        *counts.entry((key, category)).or_insert(0) += 1;
    }

    let row_labels: Vec<String> = row_labels.into_iter().collect();
    let categories: Vec<MisinformationCategory> = categories.into_iter().collect();
    let cells = row_labels
        .iter()
        .map(|r| {
            categories
                .iter()
                .map(|c| Some(counts.get(&(r.clone(), *c)).copied().unwrap_or(0) as f64))
                .collect()
        })
        .collect();

    Ok(Matrix {
        row_labels,
        column_labels: categories.iter().map(|c| c.as_str().to_string()).collect(),
        cells,
    })
}
