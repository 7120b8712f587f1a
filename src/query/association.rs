//! Pairwise association matrices
//!
//! Pearson correlation for numeric columns and bias-corrected Cramér's V for
//! categorical ones. Both use pairwise-complete rows: a row contributes to a
//! pair only when both of its cells are present.

use super::summary::numeric_values;
use super::types::{require_columns, Matrix, QueryError, QueryResult};
use crate::table::{CleanedTable, DerivedRow};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Pearson correlation matrix over `cols`.
///
/// A cell is `None` when fewer than two complete pairs exist or either side
/// has zero variance. The diagonal follows the same rule.
pub fn pearson_matrix(table: &CleanedTable, cols: &[&str]) -> QueryResult<Matrix> {
    require_columns(table, cols)?;
    if table.is_empty() {
        return Err(QueryError::EmptyInput("correlation"));
    }
    // Reject text cells up front, with the same error as numeric summaries
    for col in cols {
        numeric_values(table, col)?;
    }

    let columns: Vec<Vec<Option<f64>>> = cols
        .iter()
        .map(|c| table.rows().iter().map(|r| r.value(c).as_f64()).collect())
        .collect();

    let cells = (0..cols.len())
        .map(|i| {
            (0..cols.len())
                .map(|j| pearson(&columns[i], &columns[j]))
                .collect()
        })
        .collect();

    Ok(Matrix::square(
        cols.iter().map(|c| c.to_string()).collect(),
        cells,
    ))
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Rows to use for association: all of them, or a seeded random sample of
/// `sample_size` rows in table order when the table is larger.
pub fn sample_rows(table: &CleanedTable, sample_size: usize, seed: u64) -> Vec<&DerivedRow> {
    let rows = table.rows();
    if rows.len() <= sample_size {
        return rows.iter().collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, rows.len(), sample_size).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &rows[i]).collect()
}

/// Bias-corrected Cramér's V matrix over categorical `cols`.
///
/// Computed on [`sample_rows`]. Null cells form their own category. The
/// diagonal is 1.0. Off-diagonal cells are `None` when the contingency table
/// is degenerate (a single category on either side, or fewer than two rows).
pub fn cramers_v_matrix(table: &CleanedTable, cols: &[&str], sample_size: usize, seed: u64) -> QueryResult<Matrix> {
    require_columns(table, cols)?;
    if table.is_empty() {
        return Err(QueryError::EmptyInput("association"));
    }
    if sample_size == 0 {
        return Err(QueryError::InvalidArgument("sample size must be positive".into()));
    }

    let sample = sample_rows(table, sample_size, seed);
    let columns: Vec<Vec<Option<String>>> = cols
        .iter()
        .map(|c| sample.iter().map(|r| r.value(c).key()).collect())
        .collect();

    let cells = (0..cols.len())
        .map(|i| {
            (0..cols.len())
                .map(|j| {
                    if i == j {
                        Some(1.0)
                    } else {
                        cramers_v(&columns[i], &columns[j])
                    }
                })
                .collect()
        })
        .collect();

    Ok(Matrix::square(
        cols.iter().map(|c| c.to_string()).collect(),
        cells,
    ))
}

/// Category label of a null cell in a contingency table
pub const NULL_CATEGORY: &str = "null";

/// Bergsma's bias-corrected Cramér's V.
///
/// A null cell counts as the [`NULL_CATEGORY`] category. A 2×2 table gets
/// Yates' continuity correction.
pub fn cramers_v(xs: &[Option<String>], ys: &[Option<String>]) -> Option<f64> {
    let mut joint: HashMap<(&str, &str), f64> = HashMap::new();
    let mut row_totals: HashMap<&str, f64> = HashMap::new();
    let mut col_totals: HashMap<&str, f64> = HashMap::new();
    let mut n = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let x = x.as_deref().unwrap_or(NULL_CATEGORY);
        let y = y.as_deref().unwrap_or(NULL_CATEGORY);
        *joint.entry((x, y)).or_insert(0.0) += 1.0;
        *row_totals.entry(x).or_insert(0.0) += 1.0;
        *col_totals.entry(y).or_insert(0.0) += 1.0;
        n += 1.0;
    }

    let r = row_totals.len() as f64;
    let k = col_totals.len() as f64;
    if n < 2.0 || r < 2.0 || k < 2.0 {
        return None;
    }

    let yates = r == 2.0 && k == 2.0;
    let mut chi2 = 0.0;
    for (x, rt) in &row_totals {
        for (y, ct) in &col_totals {
            let expected = rt * ct / n;
            let observed = joint.get(&(*x, *y)).copied().unwrap_or(0.0);
            let mut diff = (observed - expected).abs();
            if yates {
                diff -= diff.min(0.5);
            }
            chi2 += diff.powi(2) / expected;
        }
    }

    let phi2 = chi2 / n;
    let phi2_corr = (phi2 - (k - 1.0) * (r - 1.0) / (n - 1.0)).max(0.0);
    let r_corr = r - (r - 1.0).powi(2) / (n - 1.0);
    let k_corr = k - (k - 1.0).powi(2) / (n - 1.0);
    let denom = (k_corr - 1.0).min(r_corr - 1.0);
    if denom <= 0.0 {
        return None;
    }
    Some((phi2_corr / denom).sqrt().min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{columns, Value};
    use crate::test_support::cleaned;

    fn numeric_table() -> CleanedTable {
        cleaned(
            &["a", "b", "c", "flat"],
            vec![
                vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(7)],
                vec![Value::Int(2), Value::Int(4), Value::Int(2), Value::Int(7)],
                vec![Value::Int(3), Value::Int(6), Value::Int(1), Value::Int(7)],
                vec![Value::Null, Value::Int(8), Value::Int(0), Value::Int(7)],
            ],
        )
    }

    #[test]
    fn test_pearson_perfect_correlations() {
        let m = pearson_matrix(&numeric_table(), &["a", "b", "c"]).unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get("a", "c").unwrap() + 1.0).abs() < 1e-12);
        assert!((m.get("b", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance_is_undefined() {
        let m = pearson_matrix(&numeric_table(), &["a", "flat"]).unwrap();
        assert_eq!(m.get("a", "flat"), None);
        assert_eq!(m.get("flat", "flat"), None);
    }

    #[test]
    fn test_pearson_on_empty_table() {
        let table = cleaned(&["a"], vec![]);
        assert_eq!(
            pearson_matrix(&table, &["a"]),
            Err(QueryError::EmptyInput("correlation"))
        );
    }

    #[test]
    fn test_pearson_rejects_text_column() {
        assert_eq!(
            pearson_matrix(&numeric_table(), &["a", columns::TEXT]),
            Err(QueryError::NotNumeric(columns::TEXT.into()))
        );
    }

    fn categorical(pairs: &[(&str, &str)]) -> CleanedTable {
        cleaned(
            &["x", "y"],
            pairs
                .iter()
                .map(|(x, y)| vec![Value::text(*x), Value::text(*y)])
                .collect(),
        )
    }

    #[test]
    fn test_cramers_v_perfect_association() {
        let pairs: Vec<(&str, &str)> = (0..20)
            .map(|i| if i % 2 == 0 { ("jpg", "image") } else { ("mp4", "video") })
            .collect();
        let m = cramers_v_matrix(&categorical(&pairs), &["x", "y"], 5000, 42).unwrap();
        assert_eq!(m.get("x", "x"), Some(1.0));

        // 2x2 with Yates: chi2 = 16.2 over n = 20
        let n1: f64 = 19.0;
        let expected = ((0.81 - 1.0 / n1) / (1.0 - 1.0 / n1)).sqrt();
        assert!((m.get("x", "y").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cramers_v_null_is_its_own_category() {
        // text rows carry no media type
        let rows = (0..20)
            .map(|i| match i % 4 {
                1 => vec![Value::text("mp4"), Value::text("media")],
                3 => vec![Value::text("jpg"), Value::text("media")],
                _ => vec![Value::Null, Value::text("text")],
            })
            .collect();
        let table = cleaned(&[columns::MEDIA_TYPE, "message_type"], rows);

        let m = cramers_v_matrix(&table, &[columns::MEDIA_TYPE, "message_type"], 5000, 42).unwrap();
        let v = m.get(columns::MEDIA_TYPE, "message_type").unwrap();

        // 3x2, chi2 = 20 over n = 20, no continuity correction
        let n1: f64 = 19.0;
        let expected = ((1.0 - 2.0 / n1) / (1.0 - 1.0 / n1)).sqrt();
        assert!((v - expected).abs() < 1e-9);
        assert!(v > 0.95);
    }

    #[test]
    fn test_cramers_v_independent_columns() {
        let mut pairs = Vec::new();
        for _ in 0..10 {
            pairs.extend([("a", "p"), ("a", "q"), ("b", "p"), ("b", "q")]);
        }
        let m = cramers_v_matrix(&categorical(&pairs), &["x", "y"], 5000, 42).unwrap();
        assert_eq!(m.get("x", "y"), Some(0.0));
    }

    #[test]
    fn test_cramers_v_single_category_is_undefined() {
        let m = cramers_v_matrix(&categorical(&[("a", "p"), ("a", "q")]), &["x", "y"], 5000, 42).unwrap();
        assert_eq!(m.get("x", "y"), None);
    }

    #[test]
    fn test_sampling_is_seeded_and_ordered() {
        let pairs: Vec<(&str, &str)> = (0..50).map(|_| ("a", "b")).collect();
        let table = categorical(&pairs);
        let first: Vec<_> = sample_rows(&table, 10, 42).iter().map(|r| r.id()).collect();
        let second: Vec<_> = sample_rows(&table, 10, 42).iter().map(|r| r.id()).collect();
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sample_rows(&table, 100, 42).len(), 50);
    }
}
