//! Conversions from aggregation results to report tables

use crate::query::{GroupedCounts, Leaderboard, Matrix, NumericSummary};
use crate::report::ReportTable;

/// Fixed four-decimal rendering so reports are byte-stable
pub fn format_float(value: f64) -> String {
    format!("{:.4}", value)
}

/// A statistic, or "undefined" when it could not be computed
pub fn format_stat(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_else(|| "undefined".to_string())
}

pub fn leaderboard_table(board: &Leaderboard, key_header: &str, value_header: &str) -> ReportTable {
    let mut table = ReportTable::new(["Rank", key_header, value_header]);
    for entry in &board.entries {
        table.push_row([entry.rank.to_string(), entry.key.clone(), entry.value.to_string()]);
    }
    table
}

pub fn grouped_table(counts: &GroupedCounts, key_header: &str) -> ReportTable {
    let mut table = ReportTable::new([key_header, "Count"]);
    for (key, count) in &counts.groups {
        table.push_row([key.clone(), count.to_string()]);
    }
    table
}

/// Count and percentage per category. `labels` renames raw category keys
/// (e.g. `"true"` to `"With Media"`); unlisted keys are shown as is.
pub fn proportions_table(counts: &GroupedCounts, key_header: &str, labels: &[(&str, &str)]) -> ReportTable {
    let mut table = ReportTable::new([key_header, "Count", "Percent"]);
    for ((key, count), (_, percent)) in counts.groups.iter().zip(counts.proportions()) {
        let label = labels
            .iter()
            .find(|(raw, _)| *raw == key.as_str())
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| key.clone());
        table.push_row([label, count.to_string(), format!("{:.1}%", percent)]);
    }
    table
}

/// How matrix cells are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Whole numbers, e.g. contingency counts
    Counts,
    /// Four decimals, e.g. correlation coefficients
    Coefficients,
}

/// Matrix with row labels in the first column. Undefined cells read
/// "undefined".
pub fn matrix_table(matrix: &Matrix, corner: &str, format: CellFormat) -> ReportTable {
    let headers = std::iter::once(corner.to_string()).chain(matrix.column_labels.iter().cloned());
    let mut table = ReportTable::new(headers);
    for (label, cells) in matrix.row_labels.iter().zip(&matrix.cells) {
        let rendered = cells.iter().map(|cell| match (format, cell) {
            (CellFormat::Counts, Some(x)) => format!("{}", x.round() as i64),
            (_, other) => format_stat(*other),
        });
        table.push_row(std::iter::once(label.clone()).chain(rendered));
    }
    table
}

/// Mean, median and count of one column
pub fn central_tendency_table(summary: &NumericSummary) -> ReportTable {
    ReportTable::new(["mean", "median", "count"]).with_row([
        format_stat(summary.mean),
        format_stat(summary.median),
        summary.count.to_string(),
    ])
}

/// Standard deviation, min and max of one column
pub fn variability_table(summary: &NumericSummary) -> ReportTable {
    ReportTable::new(["std", "min", "max"]).with_row([
        format_stat(summary.std),
        format_stat(summary.min),
        format_stat(summary.max),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(None), "undefined");
        assert_eq!(format_stat(Some(2.5)), "2.5000");
    }

    #[test]
    fn test_leaderboard_table() {
        let board = Leaderboard::from_counts(vec![("C".to_string(), 3), ("A".to_string(), 2)], 2);
        let table = leaderboard_table(&board, "User ID", "Message Count");
        assert_eq!(table.headers, vec!["Rank", "User ID", "Message Count"]);
        assert_eq!(table.rows[0], vec!["1", "C", "3"]);
    }

    #[test]
    fn test_proportions_use_labels() {
        let counts = GroupedCounts {
            column: "has_media".into(),
            groups: vec![("false".into(), 3), ("true".into(), 1)],
        };
        let table = proportions_table(&counts, "Type", &[("false", "Text Only"), ("true", "With Media")]);
        assert_eq!(table.rows[0], vec!["Text Only", "3", "75.0%"]);
        assert_eq!(table.rows[1], vec!["With Media", "1", "25.0%"]);
    }

    #[test]
    fn test_matrix_table_formats_cells() {
        let m = Matrix::square(
            vec!["a".into(), "b".into()],
            vec![vec![Some(1.0), None], vec![Some(12.0), Some(0.25)]],
        );
        let table = matrix_table(&m, "", CellFormat::Coefficients);
        assert_eq!(table.headers, vec!["", "a", "b"]);
        assert_eq!(table.rows[0], vec!["a", "1.0000", "undefined"]);
        assert_eq!(table.rows[1], vec!["b", "12.0000", "0.2500"]);

        let counts = matrix_table(&m, "", CellFormat::Counts);
        assert_eq!(counts.rows[1], vec!["b", "12", "0"]);
    }
}
