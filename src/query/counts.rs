//! Scalar counts, grouped breakdowns and cross-tabulation

use super::types::{require_columns, sort_counts, GroupedCounts, Matrix, QueryResult};
use crate::table::{CleanedTable, DerivedRow};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Number of rows
pub fn total_rows(table: &CleanedTable) -> usize {
    table.len()
}

/// Number of distinct non-null values in `column`
pub fn distinct_count(table: &CleanedTable, column: &str) -> QueryResult<usize> {
    require_columns(table, &[column])?;
    let distinct: HashSet<String> = table
        .rows()
        .iter()
        .filter_map(|r| r.value(column).key())
        .collect();
    Ok(distinct.len())
}

/// Count rows per category of `column`; null cells are not counted
pub fn group_counts(table: &CleanedTable, column: &str) -> QueryResult<GroupedCounts> {
    group_counts_where(table, column, |_| true)
}

/// Like [`group_counts`] over the rows accepted by `predicate`
pub fn group_counts_where<F>(table: &CleanedTable, column: &str, predicate: F) -> QueryResult<GroupedCounts>
where
    F: Fn(&DerivedRow) -> bool,
{
    require_columns(table, &[column])?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in table.rows().iter().filter(|r| predicate(r)) {
        if let Some(key) = row.value(column).key() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    let mut groups: Vec<(String, u64)> = counts.into_iter().collect();
    sort_counts(&mut groups);
    Ok(GroupedCounts {
        column: column.to_string(),
        groups,
    })
}

/// Contingency counts of two categorical columns. Rows where either cell is
/// null are skipped. Labels are sorted ascending.
pub fn crosstab(table: &CleanedTable, row_column: &str, col_column: &str) -> QueryResult<Matrix> {
    require_columns(table, &[row_column, col_column])?;
    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    let mut row_labels = BTreeSet::new();
    let mut column_labels = BTreeSet::new();
    for row in table.rows() {
        if let (Some(a), Some(b)) = (row.value(row_column).key(), row.value(col_column).key()) {
            row_labels.insert(a.clone());
            column_labels.insert(b.clone());
            *counts.entry((a, b)).or_insert(0) += 1;
        }
    }

    let row_labels: Vec<String> = row_labels.into_iter().collect();
    let column_labels: Vec<String> = column_labels.into_iter().collect();
    let cells = row_labels
        .iter()
        .map(|a| {
            column_labels
                .iter()
                .map(|b| Some(counts.get(&(a.clone(), b.clone())).copied().unwrap_or(0) as f64))
                .collect()
        })
        .collect();

    Ok(Matrix {
        row_labels,
        column_labels,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use crate::test_support::cleaned;
    use crate::table::{columns, Value};

    fn authors_table() -> CleanedTable {
        cleaned(
            &[columns::AUTHOR, columns::TEXT, columns::HAS_MEDIA],
            vec![
                vec![Value::text("A"), Value::text("x"), Value::Bool(true)],
                vec![Value::text("A"), Value::text("y"), Value::Bool(false)],
                vec![Value::text("B"), Value::Null, Value::Bool(false)],
                vec![Value::Null, Value::text("z"), Value::Bool(false)],
            ],
        )
    }

    #[test]
    fn test_distinct_count_skips_nulls() {
        let table = authors_table();
        assert_eq!(distinct_count(&table, columns::AUTHOR).unwrap(), 2);
        assert_eq!(total_rows(&table), 4);
    }

    #[test]
    fn test_unknown_column() {
        let table = authors_table();
        assert_eq!(
            distinct_count(&table, "country"),
            Err(QueryError::ColumnNotFound("country".into()))
        );
    }

    #[test]
    fn test_group_counts_sorted() {
        let counts = group_counts(&authors_table(), columns::HAS_MEDIA).unwrap();
        assert_eq!(counts.groups, vec![("false".to_string(), 3), ("true".to_string(), 1)]);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_group_counts_on_empty_table() {
        let table = cleaned(&[columns::AUTHOR, columns::TEXT], vec![]);
        let counts = group_counts(&table, columns::AUTHOR).unwrap();
        assert!(counts.is_empty());
        assert_eq!(distinct_count(&table, columns::AUTHOR).unwrap(), 0);
    }

    #[test]
    fn test_crosstab() {
        let m = crosstab(&authors_table(), columns::AUTHOR, columns::HAS_MEDIA).unwrap();
        assert_eq!(m.row_labels, vec!["A", "B"]);
        assert_eq!(m.column_labels, vec!["false", "true"]);
        assert_eq!(m.get("A", "true"), Some(1.0));
        assert_eq!(m.get("B", "true"), Some(0.0));
    }
}
