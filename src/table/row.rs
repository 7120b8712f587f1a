//! Raw message rows and the input table

use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Canonical column names of a message export
pub mod columns {
    pub const AUTHOR: &str = "author";
    pub const GROUP: &str = "group";
    pub const TEXT: &str = "text";
    pub const HAS_MEDIA: &str = "has_media";
    pub const MEDIA_TYPE: &str = "media_type";
    pub const HAS_MEDIA_URL: &str = "has_media_url";
    pub const MEDIA_URL: &str = "media_url";
    pub const TIMESTAMP: &str = "timestamp";
    pub const SCORE_SENTIMENT: &str = "score_sentiment";
    pub const SCORE_MISINFORMATION: &str = "score_misinformation";

    // Derived feature columns
    pub const LENGTH: &str = "length";
    pub const WORD_COUNT: &str = "word_count";
    pub const DUPLICATE_COUNT: &str = "duplicate_count";
    pub const IS_VIRAL: &str = "is_viral";
    pub const SENTIMENT: &str = "sentiment";

    /// Columns added by feature derivation, in snapshot order
    pub const DERIVED: [&str; 5] = [LENGTH, WORD_COUNT, DUPLICATE_COUNT, IS_VIRAL, SENTIMENT];
}

/// Errors raised when a table lacks a column a stage depends on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
}

static NULL: Value = Value::Null;

/// Stable identifier of a row: its position in the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(usize);

impl RowId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ingested message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(id: RowId, fields: BTreeMap<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Cell for `column`, or `Null` when the row has no such field
    pub fn get(&self, column: &str) -> &Value {
        self.fields.get(column).unwrap_or(&NULL)
    }

    /// Message text; `None` for null or non-text cells
    pub fn text(&self) -> Option<&str> {
        self.get(columns::TEXT).as_str()
    }

    pub fn flag(&self, column: &str) -> Option<bool> {
        self.get(column).as_bool()
    }
}

/// The input table handed over by an external loader.
///
/// Column order is the declared schema; rows keep insertion order and are
/// numbered from zero.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RawTable {
    /// Create an empty table with a declared schema
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from loose records. The schema is the union of all
    /// field names, in first-seen order.
    pub fn from_records(records: impl IntoIterator<Item = BTreeMap<String, Value>>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Append a record, extending the schema with any unseen field names
    pub fn push(&mut self, fields: BTreeMap<String, Value>) -> RowId {
        for name in fields.keys() {
            if !self.has_column(name) {
                self.columns.push(name.clone());
            }
        }
        let id = RowId::new(self.rows.len());
        self.rows.push(Row::new(id, fields));
        id
    }

    /// Append a record given as `(column, value)` pairs
    pub fn push_pairs<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> RowId
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.push(fields)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<(), SchemaError> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(SchemaError::MissingColumn(name.to_string()))
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_sequential_ids() {
        let mut table = RawTable::new([columns::TEXT]);
        let a = table.push_pairs([(columns::TEXT, "a")]);
        let b = table.push_pairs([(columns::TEXT, "b")]);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_schema_grows_with_unseen_fields() {
        let mut table = RawTable::new([columns::TEXT]);
        table.push_pairs([(columns::TEXT, Value::text("x")), ("messenger", Value::text("telegram"))]);
        assert_eq!(table.columns(), &["text".to_string(), "messenger".to_string()]);
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let mut table = RawTable::new([columns::TEXT, columns::MEDIA_TYPE]);
        table.push_pairs([(columns::TEXT, "hello")]);
        let row = &table.rows()[0];
        assert!(row.get(columns::MEDIA_TYPE).is_null());
        assert_eq!(row.text(), Some("hello"));
    }

    #[test]
    fn test_require_column() {
        let table = RawTable::new([columns::AUTHOR]);
        assert!(table.require_column(columns::AUTHOR).is_ok());
        assert_eq!(
            table.require_column(columns::TEXT),
            Err(SchemaError::MissingColumn("text".into()))
        );
    }
}
