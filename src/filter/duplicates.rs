//! Exact-duplicate row filter

use crate::table::{DerivedRow, Value};
use std::collections::HashSet;

#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => CellKey::Null,
            Value::Bool(b) => CellKey::Bool(*b),
            Value::Int(i) => CellKey::Int(*i),
            Value::Float(x) => CellKey::Float(x.to_bits()),
            Value::Text(s) => CellKey::Text(s),
        }
    }
}

/// Identity of a row's raw fields. Null cells are dropped so an explicit
/// `null` and an absent field compare equal.
fn row_key(row: &DerivedRow) -> Vec<(&str, CellKey<'_>)> {
    row.row
        .fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.as_str(), CellKey::from(v)))
        .collect()
}

/// Drop rows whose raw fields repeat an earlier row; the first occurrence
/// survives. Returns the survivors and the number removed.
pub fn drop_exact_duplicates(rows: Vec<DerivedRow>) -> (Vec<DerivedRow>, usize) {
    let before = rows.len();
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        rows.iter().map(|r| seen.insert(row_key(r))).collect()
    };
    let kept: Vec<DerivedRow> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_features;
    use crate::table::{columns, RawTable};

    #[test]
    fn test_keeps_first_occurrence() {
        let mut table = RawTable::new([columns::AUTHOR, columns::TEXT]);
        table.push_pairs([(columns::AUTHOR, "a"), (columns::TEXT, "oi")]);
        table.push_pairs([(columns::AUTHOR, "b"), (columns::TEXT, "oi")]);
        table.push_pairs([(columns::AUTHOR, "a"), (columns::TEXT, "oi")]);
        let rows = derive_features(&table).unwrap().rows().to_vec();

        let (kept, removed) = drop_exact_duplicates(rows);
        assert_eq!(removed, 1);
        let ids: Vec<usize> = kept.iter().map(|r| r.id().index()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_duplicate_count_survives_removal() {
        let mut table = RawTable::new([columns::TEXT]);
        table.push_pairs([(columns::TEXT, "same")]);
        table.push_pairs([(columns::TEXT, "same")]);
        let rows = derive_features(&table).unwrap().rows().to_vec();

        let (kept, _) = drop_exact_duplicates(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].features.duplicate_count, 2);
        assert!(kept[0].features.is_viral);
    }
}
