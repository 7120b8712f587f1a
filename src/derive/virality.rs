//! Duplicate counting for virality

use std::collections::HashMap;

/// Strategy for counting how many rows share a message's content
pub trait ViralityStrategy: Send + Sync {
    fn id(&self) -> &str;

    /// One count per input text, in input order. A count includes the row
    /// itself, so it is never below 1.
    fn duplicate_counts(&self, texts: &[Option<&str>]) -> Vec<usize>;
}

/// Exact, un-normalized text equality. Null texts never match each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTextMatch;

impl ViralityStrategy for ExactTextMatch {
    fn id(&self) -> &str {
        "exact-text"
    }

    fn duplicate_counts(&self, texts: &[Option<&str>]) -> Vec<usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for text in texts.iter().flatten() {
            *counts.entry(*text).or_insert(0) += 1;
        }

        texts
            .iter()
            .map(|text| match text {
                Some(t) => counts.get(t).copied().unwrap_or(1),
                None => 1,
            })
            .collect()
    }
}
