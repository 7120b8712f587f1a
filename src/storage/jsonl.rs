//! JSON Lines loader
//!
//! One JSON object per line, one message per object. Field names of the
//! public messaging export are mapped onto the canonical column names;
//! other fields are kept as they are. Blank lines are skipped.

use super::traits::{StorageError, StorageResult};
use crate::table::{columns, RawTable, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Export field name to canonical column name
pub const FIELD_ALIASES: [(&str, &str); 4] = [
    ("id_member_anonymous", columns::AUTHOR),
    ("id_group_anonymous", columns::GROUP),
    ("text_content_anonymous", columns::TEXT),
    ("date_message", columns::TIMESTAMP),
];

/// Canonical name of an export field
pub fn canonical_name(field: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == field)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(field)
}

/// Read a table from JSON Lines
pub fn read_jsonl(reader: impl BufRead) -> StorageResult<RawTable> {
    let mut table = RawTable::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: BTreeMap<String, Value> =
            serde_json::from_str(&line).map_err(|source| StorageError::Parse {
                line: index + 1,
                source,
            })?;
        table.push(
            record
                .into_iter()
                .map(|(field, value)| (canonical_name(&field).to_string(), value))
                .collect(),
        );
    }
    Ok(table)
}

/// Read a table from a JSON Lines file
pub fn load_jsonl(path: impl AsRef<Path>) -> StorageResult<RawTable> {
    let path = path.as_ref();
    let table = read_jsonl(BufReader::new(File::open(path)?))?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded messages"
    );
    Ok(table)
}
