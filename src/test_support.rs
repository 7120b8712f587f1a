//! Table builders shared by unit tests

use crate::derive::derive_features;
use crate::table::{columns, CleanedTable, RawTable, Value};

/// Build an unfiltered cleaned table from positional rows. A `text` column
/// is added to the schema when absent so derivation succeeds.
pub fn cleaned(schema: &[&str], rows: Vec<Vec<Value>>) -> CleanedTable {
    let mut names: Vec<&str> = schema.to_vec();
    if !names.contains(&columns::TEXT) {
        names.push(columns::TEXT);
    }
    let mut table = RawTable::new(names.iter().copied());
    for values in rows {
        table.push_pairs(schema.iter().copied().zip(values));
    }
    CleanedTable::unfiltered(derive_features(&table).expect("text column present"))
}

/// Single-column table of message texts
pub fn texts(values: &[Option<&str>]) -> CleanedTable {
    cleaned(
        &[columns::TEXT],
        values.iter().map(|t| vec![Value::from(*t)]).collect(),
    )
}
