//! Queries over message text: search, sentiment and length

use super::types::{require_columns, QueryResult};
use crate::table::{columns, CleanedTable, RowId, SentimentClass};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A message picked out by a text query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    pub row: RowId,
    pub text: String,
    pub length: usize,
}

/// Up to `limit` rows whose text contains every term (case-insensitive),
/// in table order
pub fn search_text(table: &CleanedTable, required: &[&str], limit: usize) -> QueryResult<Vec<TextMatch>> {
    require_columns(table, &[columns::TEXT])?;
    let terms: Vec<String> = required.iter().map(|t| t.to_lowercase()).collect();
    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            let text = row.text()?;
            let lowered = text.to_lowercase();
            terms.iter().all(|t| lowered.contains(t.as_str())).then(|| TextMatch {
                row: row.id(),
                text: text.to_string(),
                length: row.features.length,
            })
        })
        .take(limit)
        .collect())
}

/// First `limit` distinct texts classified as `class`, in table order
pub fn distinct_texts_by_sentiment(table: &CleanedTable, class: SentimentClass, limit: usize) -> QueryResult<Vec<String>> {
    require_columns(table, &[columns::TEXT])?;
    let mut seen = HashSet::new();
    Ok(table
        .rows()
        .iter()
        .filter(|r| r.features.sentiment == class)
        .filter_map(|r| r.text())
        .filter(|t| seen.insert(*t))
        .take(limit)
        .map(str::to_string)
        .collect())
}

/// Longest and shortest messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthExtremes {
    /// Length descending
    pub longest: Vec<TextMatch>,
    /// Length ascending, empty and null texts excluded
    pub shortest: Vec<TextMatch>,
}

/// The `n` longest and `n` shortest non-empty messages. Ties keep table order.
pub fn length_extremes(table: &CleanedTable, n: usize) -> QueryResult<LengthExtremes> {
    require_columns(table, &[columns::TEXT])?;
    let mut messages: Vec<TextMatch> = table
        .rows()
        .iter()
        .filter(|r| r.features.length > 0)
        .filter_map(|r| {
            Some(TextMatch {
                row: r.id(),
                text: r.text()?.to_string(),
                length: r.features.length,
            })
        })
        .collect();

    messages.sort_by(|a, b| b.length.cmp(&a.length));
    let longest = messages.iter().take(n).cloned().collect();
    messages.sort_by(|a, b| a.length.cmp(&b.length).then_with(|| a.row.cmp(&b.row)));
    messages.truncate(n);

    Ok(LengthExtremes {
        longest,
        shortest: messages,
    })
}

/// Summed sentiment encoding of one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorScore {
    pub author: String,
    pub score: i64,
}

/// Authors with the highest and lowest summed sentiment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentExtremes {
    pub most_optimistic: Option<AuthorScore>,
    pub most_pessimistic: Option<AuthorScore>,
}

/// Per-author sum of the sentiment encoding, highest first, ties by author
pub fn author_sentiment_totals(table: &CleanedTable) -> QueryResult<Vec<AuthorScore>> {
    require_columns(table, &[columns::AUTHOR])?;
    let mut sums: HashMap<String, i64> = HashMap::new();
    for row in table.rows() {
        if let Some(author) = row.row.get(columns::AUTHOR).key() {
            *sums.entry(author).or_insert(0) += row.features.sentiment.score();
        }
    }
    let mut totals: Vec<AuthorScore> = sums
        .into_iter()
        .map(|(author, score)| AuthorScore { author, score })
        .collect();
    totals.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.author.cmp(&b.author)));
    Ok(totals)
}

/// Most optimistic and most pessimistic author. Ties go to the smaller
/// author id on both ends.
pub fn author_sentiment_extremes(table: &CleanedTable) -> QueryResult<SentimentExtremes> {
    let totals = author_sentiment_totals(table)?;
    let most_optimistic = totals.first().cloned();
    let most_pessimistic = totals
        .iter()
        .min_by(|a, b| a.score.cmp(&b.score).then_with(|| a.author.cmp(&b.author)))
        .cloned();
    Ok(SentimentExtremes {
        most_optimistic,
        most_pessimistic,
    })
}
