//! Minimum word-count filter

use crate::table::DerivedRow;

/// Drops rows whose `word_count` is below a threshold
#[derive(Debug, Clone, Copy)]
pub struct MinWords(pub usize);

impl MinWords {
    pub fn apply(&self, rows: Vec<DerivedRow>) -> (Vec<DerivedRow>, usize) {
        let before = rows.len();
        let kept: Vec<DerivedRow> = rows
            .into_iter()
            .filter(|r| r.features.word_count >= self.0)
            .collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_features;
    use crate::table::{columns, RawTable, Value};

    #[test]
    fn test_threshold_is_inclusive() {
        let mut table = RawTable::new([columns::TEXT]);
        table.push_pairs([(columns::TEXT, Value::text("um dois tres quatro cinco"))]);
        table.push_pairs([(columns::TEXT, Value::text("um dois"))]);
        table.push_pairs([(columns::TEXT, Value::Null)]);
        let rows = derive_features(&table).unwrap().rows().to_vec();

        let (kept, removed) = MinWords(5).apply(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 2);
    }
}
