//! Feature derivation engine
//!
//! Turns a [`RawTable`] into a [`DerivedTable`] with one derived row per
//! input row, in input order. Derivation is a pure function of the input:
//! running it twice over the same table yields identical features.
//!
//! # Features
//!
//! - **length**: Unicode scalar count of the text
//! - **word_count**: whitespace token count
//! - **duplicate_count** / **is_viral**: exact-text duplicate grouping over
//!   the whole input, computed before any filtering
//! - **sentiment**: keyword heuristic (see [`KeywordSentiment`])
//!
//! Sentiment and virality are strategies, so a model-backed classifier can
//! replace either without touching the pipeline.

mod sentiment;
mod text;
mod virality;

pub use sentiment::{KeywordSentiment, SentimentStrategy};
pub use text::{length, word_count};
pub use virality::{ExactTextMatch, ViralityStrategy};

use crate::table::{columns, DerivedRow, DerivedTable, Features, RawTable, SchemaError};
use tracing::debug;

/// Computes derived features with pluggable sentiment and virality strategies
pub struct FeatureDeriver {
    sentiment: Box<dyn SentimentStrategy>,
    virality: Box<dyn ViralityStrategy>,
}

impl Default for FeatureDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureDeriver {
    /// Keyword sentiment and exact-text virality
    pub fn new() -> Self {
        Self {
            sentiment: Box::new(KeywordSentiment::new()),
            virality: Box::new(ExactTextMatch),
        }
    }

    pub fn with_sentiment<S: SentimentStrategy + 'static>(mut self, strategy: S) -> Self {
        self.sentiment = Box::new(strategy);
        self
    }

    pub fn with_virality<V: ViralityStrategy + 'static>(mut self, strategy: V) -> Self {
        self.virality = Box::new(strategy);
        self
    }

    /// Derive features for every row of `table`.
    ///
    /// Fails only when the table has no `text` column.
    pub fn derive(&self, table: &RawTable) -> Result<DerivedTable, SchemaError> {
        table.require_column(columns::TEXT)?;

        let texts: Vec<Option<&str>> = table.rows().iter().map(|r| r.text()).collect();
        let duplicate_counts = self.virality.duplicate_counts(&texts);

        let rows = table
            .rows()
            .iter()
            .zip(texts.iter().zip(duplicate_counts))
            .map(|(row, (text, duplicate_count))| DerivedRow {
                row: row.clone(),
                features: Features {
                    length: length(*text),
                    word_count: word_count(*text),
                    duplicate_count,
                    is_viral: duplicate_count > 1,
                    sentiment: self.sentiment.classify(*text),
                },
            })
            .collect::<Vec<_>>();

        debug!(
            rows = rows.len(),
            sentiment = self.sentiment.id(),
            virality = self.virality.id(),
            "derived features"
        );

        Ok(DerivedTable::new(table.columns().to_vec(), rows))
    }
}

/// Derive features with the default strategies
pub fn derive_features(table: &RawTable) -> Result<DerivedTable, SchemaError> {
    FeatureDeriver::new().derive(table)
}
