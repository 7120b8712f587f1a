//! Length features of message text

/// Unicode scalar count; 0 for a null text
pub fn length(text: Option<&str>) -> usize {
    text.map(|t| t.chars().count()).unwrap_or(0)
}

/// Count of maximal whitespace-delimited tokens; 0 for a null text
pub fn word_count(text: Option<&str>) -> usize {
    text.map(|t| t.split_whitespace().count()).unwrap_or(0)
}
