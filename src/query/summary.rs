//! Descriptive statistics and frequency tables for single columns

use super::counts::{distinct_count, group_counts};
use super::types::{require_columns, GroupedCounts, QueryError, QueryResult};
use crate::table::CleanedTable;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of a numeric column.
///
/// `count` is the number of non-null values. Every other statistic is `None`
/// ("undefined") when it cannot be computed: all of them on zero values, and
/// `std` on a single value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation (n - 1 denominator)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Non-null numeric values of `column`, in table order.
///
/// Booleans count as non-numeric; a text cell makes the column non-numeric.
pub fn numeric_values(table: &CleanedTable, column: &str) -> QueryResult<Vec<f64>> {
    require_columns(table, &[column])?;
    let mut values = Vec::with_capacity(table.len());
    for row in table.rows() {
        let cell = row.value(column);
        if cell.is_null() {
            continue;
        }
        match cell.as_f64() {
            Some(x) => values.push(x),
            None => return Err(QueryError::NotNumeric(column.to_string())),
        }
    }
    Ok(values)
}

/// Mean, median, count, standard deviation, min and max of `column`
pub fn numeric_summary(table: &CleanedTable, column: &str) -> QueryResult<NumericSummary> {
    let values = numeric_values(table, column)?;
    Ok(summarize(column, values))
}

pub(crate) fn summarize(column: &str, mut values: Vec<f64>) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            column: column.to_string(),
            ..Default::default()
        };
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let median = if count % 2 == 1 {
        values[count / 2]
    } else {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    };
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    NumericSummary {
        column: column.to_string(),
        count,
        mean: Some(mean),
        median: Some(median),
        std,
        min: values.first().copied(),
        max: values.last().copied(),
    }
}

/// Columns whose non-null cells are all numbers (and that have at least one)
pub fn numeric_columns(table: &CleanedTable) -> Vec<String> {
    table
        .columns()
        .into_iter()
        .filter(|c| {
            let mut seen = false;
            for row in table.rows() {
                let cell = row.value(c);
                if cell.is_null() {
                    continue;
                }
                if !cell.is_numeric() {
                    return false;
                }
                seen = true;
            }
            seen
        })
        .collect()
}

/// Outcome of a frequency-table request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FrequencyTable {
    Counts(GroupedCounts),
    /// The column had `distinct` values, at or above the threshold
    SkippedHighCardinality { distinct: usize },
}

/// Value counts of `column`, emitted only when it has fewer than
/// `cardinality_threshold` distinct values
pub fn frequency_table(table: &CleanedTable, column: &str, cardinality_threshold: usize) -> QueryResult<FrequencyTable> {
    let distinct = distinct_count(table, column)?;
    if distinct >= cardinality_threshold {
        return Ok(FrequencyTable::SkippedHighCardinality { distinct });
    }
    Ok(FrequencyTable::Counts(group_counts(table, column)?))
}
