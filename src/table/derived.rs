//! Rows augmented with derived features, before and after filtering

use super::row::{columns, Row, RowId};
use super::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Tri-state sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Negative,
    Neutral,
    Positive,
}

impl SentimentClass {
    /// Classify a signed keyword score
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s > 0 => SentimentClass::Positive,
            s if s < 0 => SentimentClass::Negative,
            _ => SentimentClass::Neutral,
        }
    }

    /// Numeric encoding: +1 / 0 / -1
    pub fn score(&self) -> i64 {
        match self {
            SentimentClass::Negative => -1,
            SentimentClass::Neutral => 0,
            SentimentClass::Positive => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Negative => "Negative",
            SentimentClass::Neutral => "Neutral",
            SentimentClass::Positive => "Positive",
        }
    }
}

/// Features computed from a row's raw fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    /// Unicode scalar count of the text (0 for null)
    pub length: usize,
    /// Whitespace-delimited token count (0 for null)
    pub word_count: usize,
    /// Rows in the pre-filter table sharing this exact text, including itself
    pub duplicate_count: usize,
    pub is_viral: bool,
    pub sentiment: SentimentClass,
}

/// A row plus its derived features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub row: Row,
    pub features: Features,
}

impl DerivedRow {
    pub fn id(&self) -> RowId {
        self.row.id
    }

    pub fn text(&self) -> Option<&str> {
        self.row.text()
    }

    /// Value of a raw or derived column. Derived names shadow raw fields.
    pub fn value(&self, column: &str) -> Cow<'_, Value> {
        let f = &self.features;
        match column {
            columns::LENGTH => Cow::Owned(Value::Int(f.length as i64)),
            columns::WORD_COUNT => Cow::Owned(Value::Int(f.word_count as i64)),
            columns::DUPLICATE_COUNT => Cow::Owned(Value::Int(f.duplicate_count as i64)),
            columns::IS_VIRAL => Cow::Owned(Value::Bool(f.is_viral)),
            columns::SENTIMENT => Cow::Owned(Value::Int(f.sentiment.score())),
            raw => Cow::Borrowed(self.row.get(raw)),
        }
    }
}

fn schema_has(raw_columns: &[String], name: &str) -> bool {
    columns::DERIVED.contains(&name) || raw_columns.iter().any(|c| c == name)
}

fn snapshot_columns(raw_columns: &[String]) -> Vec<String> {
    raw_columns
        .iter()
        .filter(|c| !columns::DERIVED.contains(&c.as_str()))
        .cloned()
        .chain(columns::DERIVED.iter().map(|c| c.to_string()))
        .collect()
}

/// Output of feature derivation: every input row, in input order
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    raw_columns: Vec<String>,
    rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub(crate) fn new(raw_columns: Vec<String>, rows: Vec<DerivedRow>) -> Self {
        Self { raw_columns, rows }
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn raw_columns(&self) -> &[String] {
        &self.raw_columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        schema_has(&self.raw_columns, name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<DerivedRow>) {
        (self.raw_columns, self.rows)
    }
}

/// Derived rows that survived filtering.
///
/// Immutable once built; every aggregation reads it by shared reference.
#[derive(Debug, Clone, Default)]
pub struct CleanedTable {
    raw_columns: Vec<String>,
    rows: Vec<DerivedRow>,
}

impl CleanedTable {
    pub(crate) fn new(raw_columns: Vec<String>, rows: Vec<DerivedRow>) -> Self {
        Self { raw_columns, rows }
    }

    /// Treat a derived table as already clean (no filters applied)
    pub fn unfiltered(table: DerivedTable) -> Self {
        let (raw_columns, rows) = table.into_parts();
        Self { raw_columns, rows }
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn raw_columns(&self) -> &[String] {
        &self.raw_columns
    }

    /// Raw columns followed by the derived feature columns
    pub fn columns(&self) -> Vec<String> {
        snapshot_columns(&self.raw_columns)
    }

    pub fn has_column(&self, name: &str) -> bool {
        schema_has(&self.raw_columns, name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(DerivedRow::id).collect()
    }
}
