//! Shapiro-Wilk normality test (Royston's approximation)
//!
//! Uses `statrs` for the normal quantile and tail functions.

use super::summary::numeric_values;
use super::types::{QueryError, QueryResult};
use crate::table::CleanedTable;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Smallest sample the test is run on
pub const MIN_SAMPLE: usize = 4;

/// Significance level used by [`ShapiroWilk::looks_gaussian`]
pub const ALPHA: f64 = 0.05;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Test statistic and p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    pub n: usize,
    pub w: f64,
    pub p_value: f64,
}

impl ShapiroWilk {
    /// Fail to reject normality at [`ALPHA`]
    pub fn looks_gaussian(&self) -> bool {
        self.p_value > ALPHA
    }
}

/// Why a normality test was not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalitySkip {
    TooFew { n: usize },
    TooMany { n: usize, ceiling: usize },
    Constant { n: usize },
}

impl std::fmt::Display for NormalitySkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalitySkip::TooFew { n } => {
                write!(f, "not enough data points for Shapiro-Wilk (n = {}, need {})", n, MIN_SAMPLE)
            }
            NormalitySkip::TooMany { n, ceiling } => {
                write!(f, "Shapiro-Wilk skipped for large sample (n = {} > {})", n, ceiling)
            }
            NormalitySkip::Constant { n } => {
                write!(f, "all {} values are identical; Shapiro-Wilk is undefined", n)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NormalityOutcome {
    Tested(ShapiroWilk),
    Skipped(NormalitySkip),
}

/// Run Shapiro-Wilk on the non-null values of `column` when
/// `MIN_SAMPLE <= n <= ceiling`
pub fn normality_test(table: &CleanedTable, column: &str, ceiling: usize) -> QueryResult<NormalityOutcome> {
    let values = numeric_values(table, column)?;
    if values.is_empty() {
        return Err(QueryError::EmptyInput("normality test"));
    }
    let n = values.len();
    if n < MIN_SAMPLE {
        return Ok(NormalityOutcome::Skipped(NormalitySkip::TooFew { n }));
    }
    if n > ceiling {
        return Ok(NormalityOutcome::Skipped(NormalitySkip::TooMany { n, ceiling }));
    }
    Ok(match shapiro_wilk(values) {
        Some(result) => NormalityOutcome::Tested(result),
        None => NormalityOutcome::Skipped(NormalitySkip::Constant { n }),
    })
}

fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// W and p-value for a sample of at least [`MIN_SAMPLE`] values.
/// Returns `None` for smaller or constant samples.
pub fn shapiro_wilk(mut values: Vec<f64>) -> Option<ShapiroWilk> {
    let n = values.len();
    if n < MIN_SAMPLE {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let mean = values.iter().sum::<f64>() / n as f64;
    let ssq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    if ssq == 0.0 {
        return None;
    }

    let std_normal = Normal::new(0.0, 1.0).ok()?;
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| std_normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2: f64 = m.iter().map(|v| v * v).sum();
    let ssumm2 = summ2.sqrt();
    let u = 1.0 / nf.sqrt();

    let mut a = vec![0.0; n];
    let a_n = m[n - 1] / ssumm2 + poly(&C1, u);
    if n > 5 {
        let a_n1 = m[n - 2] / ssumm2 + poly(&C2, u);
        let eps = (summ2 - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
        for i in 2..n - 2 {
            a[i] = m[i] / eps.sqrt();
        }
        a[1] = -a_n1;
        a[n - 2] = a_n1;
    } else {
        let eps = (summ2 - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
        for i in 1..n - 1 {
            a[i] = m[i] / eps.sqrt();
        }
    }
    a[0] = -a_n;
    a[n - 1] = a_n;

    let numerator: f64 = a.iter().zip(&values).map(|(ai, xi)| ai * xi).sum();
    let w = (numerator.powi(2) / ssq).min(1.0);

    Some(ShapiroWilk {
        n,
        w,
        p_value: p_value(w, n)?,
    })
}

fn p_value(w: f64, n: usize) -> Option<f64> {
    if w >= 1.0 {
        return Some(1.0);
    }
    let nf = n as f64;
    let mut y = (1.0 - w).ln();
    let (mu, sigma) = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return Some(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };
    let dist = Normal::new(mu, sigma).ok()?;
    Some(dist.sf(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{columns, Value};
    use crate::test_support::cleaned;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_small_uniform_sample() {
        let r = shapiro_wilk(vec![4.0, 2.0, 3.0, 1.0]).unwrap();
        assert!(close(r.w, 0.99291, 1e-4), "w = {}", r.w);
        assert!(close(r.p_value, 0.97188, 1e-3), "p = {}", r.p_value);
        assert!(r.looks_gaussian());
    }

    #[test]
    fn test_royston_weights_example() {
        let r = shapiro_wilk(vec![148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0]).unwrap();
        assert!(close(r.w, 0.78881, 1e-4), "w = {}", r.w);
        assert!(close(r.p_value, 0.00670, 1e-3), "p = {}", r.p_value);
        assert!(!r.looks_gaussian());
    }

    #[test]
    fn test_large_sample_branch() {
        let r = shapiro_wilk((1..=20).map(f64::from).collect()).unwrap();
        assert!(close(r.w, 0.96038, 1e-4), "w = {}", r.w);
        assert!(close(r.p_value, 0.55137, 1e-3), "p = {}", r.p_value);
    }

    #[test]
    fn test_constant_sample_is_undefined() {
        assert!(shapiro_wilk(vec![3.0; 10]).is_none());
    }

    fn scores(n: usize) -> CleanedTable {
        cleaned(
            &[columns::SCORE_SENTIMENT],
            (0..n).map(|i| vec![Value::Float(i as f64 * 0.5)]).collect(),
        )
    }

    #[test]
    fn test_sample_bounds() {
        assert_eq!(
            normality_test(&scores(3), columns::SCORE_SENTIMENT, 5000).unwrap(),
            NormalityOutcome::Skipped(NormalitySkip::TooFew { n: 3 })
        );
        assert_eq!(
            normality_test(&scores(12), columns::SCORE_SENTIMENT, 10).unwrap(),
            NormalityOutcome::Skipped(NormalitySkip::TooMany { n: 12, ceiling: 10 })
        );
        assert!(matches!(
            normality_test(&scores(4), columns::SCORE_SENTIMENT, 5000).unwrap(),
            NormalityOutcome::Tested(_)
        ));
        assert_eq!(
            normality_test(&scores(0), columns::SCORE_SENTIMENT, 5000),
            Err(QueryError::EmptyInput("normality test"))
        );
    }
}
