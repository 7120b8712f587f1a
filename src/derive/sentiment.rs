//! Keyword sentiment heuristic
//!
//! Not a model: the score is the number of distinct positive keywords that
//! occur anywhere in the lower-cased text minus the number of distinct
//! negative keywords. Matching is substring containment, so a keyword inside
//! a longer word still counts ("bom" matches "bombeiro").

use crate::table::SentimentClass;

/// Strategy for labelling a message's sentiment
pub trait SentimentStrategy: Send + Sync {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Classify one message text; `None` means the text is null
    fn classify(&self, text: Option<&str>) -> SentimentClass;
}

const POSITIVE: [&str; 11] = [
    "bom", "ótimo", "excelente", "maravilhoso", "gostei", "amo", "adoro", "feliz", "parabéns",
    "sucesso", "incrível",
];

const NEGATIVE: [&str; 10] = [
    "ruim", "péssimo", "terrível", "odeio", "detesto", "triste", "decepção", "problema", "lixo",
    "vergonha",
];

/// Substring keyword counter with fixed positive and negative lists
#[derive(Debug, Clone)]
pub struct KeywordSentiment {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordSentiment {
    /// The Portuguese keyword lists used for the group-chat exports
    pub fn new() -> Self {
        Self::with_keywords(POSITIVE, NEGATIVE)
    }

    /// Custom keyword lists. Keywords are lower-cased and de-duplicated so
    /// each counts at most once.
    pub fn with_keywords<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    /// Signed keyword score of a text
    pub fn score(&self, text: &str) -> i64 {
        let lower = text.to_lowercase();
        let hits = |words: &[String]| words.iter().filter(|w| lower.contains(w.as_str())).count() as i64;
        hits(&self.positive) - hits(&self.negative)
    }
}

fn normalize<I>(words: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let w = word.as_ref().to_lowercase();
        if !w.is_empty() && !out.contains(&w) {
            out.push(w);
        }
    }
    out
}

impl SentimentStrategy for KeywordSentiment {
    fn id(&self) -> &str {
        "keyword-substring"
    }

    fn classify(&self, text: Option<&str>) -> SentimentClass {
        match text {
            Some(t) => SentimentClass::from_score(self.score(t)),
            None => SentimentClass::Neutral,
        }
    }
}
