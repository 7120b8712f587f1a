//! Banned-marker filter

use crate::table::DerivedRow;

/// Drops rows whose text contains a marker, ignoring case.
/// Rows with null text never match.
#[derive(Debug, Clone)]
pub struct BannedSubstring {
    marker: String,
}

impl BannedSubstring {
    pub fn new(marker: impl AsRef<str>) -> Self {
        Self {
            marker: marker.as_ref().to_lowercase(),
        }
    }

    pub fn matches(&self, row: &DerivedRow) -> bool {
        if self.marker.is_empty() {
            return false;
        }
        row.text()
            .map(|t| t.to_lowercase().contains(&self.marker))
            .unwrap_or(false)
    }

    /// Keep non-matching rows in order; returns the survivors and the
    /// number removed.
    pub fn apply(&self, rows: Vec<DerivedRow>) -> (Vec<DerivedRow>, usize) {
        let before = rows.len();
        let kept: Vec<DerivedRow> = rows.into_iter().filter(|r| !self.matches(r)).collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_features;
    use crate::table::{columns, RawTable, Value};

    fn rows(texts: &[Option<&str>]) -> Vec<DerivedRow> {
        let mut table = RawTable::new([columns::TEXT]);
        for t in texts {
            table.push_pairs([(columns::TEXT, Value::from(*t))]);
        }
        derive_features(&table).unwrap().rows().to_vec()
    }

    #[test]
    fn test_removes_marker_rows() {
        let filter = BannedSubstring::new("trava-zaps");
        let (kept, removed) = filter.apply(rows(&[Some("ok"), Some("contains trava-zaps here")]));
        assert_eq!(removed, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text(), Some("ok"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let filter = BannedSubstring::new("trava-zaps");
        let (_, removed) = filter.apply(rows(&[Some("TRAVA-ZAPS!!"), None]));
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let filter = BannedSubstring::new("trava-zaps");
        let input = rows(&[Some("a"), Some("trava-zaps"), Some("b"), None]);
        let (once, _) = filter.apply(input);
        let (twice, removed_again) = filter.apply(once.clone());
        assert_eq!(once, twice);
        assert_eq!(removed_again, 0);
    }

    #[test]
    fn test_empty_marker_matches_nothing() {
        let filter = BannedSubstring::new("");
        let (kept, removed) = filter.apply(rows(&[Some("a"), Some("b")]));
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 0);
    }
}
