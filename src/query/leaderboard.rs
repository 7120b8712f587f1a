//! Ranked top-N queries

use super::types::{require_columns, Leaderboard, QueryResult};
use crate::table::{columns, CleanedTable, DerivedRow};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Top `n` values of `column` by row count. Null keys are ignored.
pub fn leaderboard(table: &CleanedTable, column: &str, n: usize) -> QueryResult<Leaderboard> {
    leaderboard_where(table, column, n, |_| true)
}

/// Leaderboard over the rows accepted by `predicate`
pub fn leaderboard_where<F>(table: &CleanedTable, column: &str, n: usize, predicate: F) -> QueryResult<Leaderboard>
where
    F: Fn(&DerivedRow) -> bool,
{
    require_columns(table, &[column])?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in table.rows().iter().filter(|r| predicate(r)) {
        if let Some(key) = row.value(column).key() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    Ok(Leaderboard::from_counts(counts, n))
}

fn domain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:https?://)?(?:[^@/?#\n]+@)?(?:www\.)?([^:/\n?]+)").expect("valid domain pattern")
    })
}

/// Host part of a URL: scheme, user info and a leading `www.` are stripped.
///
/// User info is only recognised inside the authority, so an `@` in the path
/// or query leaves the host alone.
pub fn extract_domain(url: &str) -> Option<&str> {
    domain_pattern()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Top `n` domains of `media_url`
pub fn domain_leaderboard(table: &CleanedTable, n: usize) -> QueryResult<Leaderboard> {
    require_columns(table, &[columns::MEDIA_URL])?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in table.rows() {
        if let Some(domain) = row.row.get(columns::MEDIA_URL).as_str().and_then(extract_domain) {
            *counts.entry(domain.to_string()).or_insert(0) += 1;
        }
    }
    Ok(Leaderboard::from_counts(counts, n))
}

/// Texts ranked by the number of distinct groups they were posted in
pub fn spread_across_groups(table: &CleanedTable, n: usize) -> QueryResult<Leaderboard> {
    require_columns(table, &[columns::TEXT, columns::GROUP])?;
    let mut groups: HashMap<&str, HashSet<String>> = HashMap::new();
    for row in table.rows() {
        if let Some(text) = row.text() {
            let entry = groups.entry(text).or_default();
            if let Some(group) = row.row.get(columns::GROUP).key() {
                entry.insert(group);
            }
        }
    }
    Ok(Leaderboard::from_counts(
        groups
            .into_iter()
            .map(|(text, set)| (text.to_string(), set.len() as u64)),
        n,
    ))
}

/// An identical text posted repeatedly by one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedMessage {
    pub author: String,
    pub text: String,
    /// Number of posts of this text by this author
    pub posts: u64,
    /// Number of distinct groups those posts went to
    pub groups: u64,
}

/// How repeated messages are ranked and kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatRanking {
    /// Pairs posted more than once, ranked by post count
    ByPosts,
    /// Pairs spread over more than one group, ranked by group count
    ByGroups,
}

/// `(author, text)` pairs repeated by the same author, top `n`
pub fn repeated_by_author(table: &CleanedTable, ranking: RepeatRanking, n: usize) -> QueryResult<Vec<RepeatedMessage>> {
    require_columns(table, &[columns::AUTHOR, columns::TEXT, columns::GROUP])?;
    let mut pairs: HashMap<(String, &str), (u64, HashSet<String>)> = HashMap::new();
    for row in table.rows() {
        let (Some(author), Some(text)) = (row.row.get(columns::AUTHOR).key(), row.text()) else {
            continue;
        };
        let entry = pairs.entry((author, text)).or_default();
        entry.0 += 1;
        if let Some(group) = row.row.get(columns::GROUP).key() {
            entry.1.insert(group);
        }
    }

    let mut repeated: Vec<RepeatedMessage> = pairs
        .into_iter()
        .map(|((author, text), (posts, groups))| RepeatedMessage {
            author,
            text: text.to_string(),
            posts,
            groups: groups.len() as u64,
        })
        .filter(|m| match ranking {
            RepeatRanking::ByPosts => m.posts > 1,
            RepeatRanking::ByGroups => m.groups > 1,
        })
        .collect();

    repeated.sort_by(|a, b| {
        let (ka, kb) = match ranking {
            RepeatRanking::ByPosts => (a.posts, b.posts),
            RepeatRanking::ByGroups => (a.groups, b.groups),
        };
        kb.cmp(&ka)
            .then_with(|| a.author.cmp(&b.author))
            .then_with(|| a.text.cmp(&b.text))
    });
    repeated.truncate(n);
    Ok(repeated)
}

/// Texts ranked by occurrence count in the table
pub fn top_texts(table: &CleanedTable, n: usize) -> QueryResult<Leaderboard> {
    leaderboard(table, columns::TEXT, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use crate::table::Value;
    use crate::test_support::cleaned;

    #[test]
    fn test_author_leaderboard_scenario() {
        let table = cleaned(
            &[columns::AUTHOR],
            ["A", "A", "B", "C", "C", "C"]
                .iter()
                .map(|a| vec![Value::text(*a)])
                .collect(),
        );
        let board = leaderboard(&table, columns::AUTHOR, 2).unwrap();
        assert_eq!(board.pairs(), vec![("C", 3), ("A", 2)]);
        assert_eq!(board.entries[0].rank, 1);
    }

    #[test]
    fn test_tied_counts_sorted_by_key() {
        let table = cleaned(
            &[columns::AUTHOR],
            ["z", "y", "x", "y", "z", "x"]
                .iter()
                .map(|a| vec![Value::text(*a)])
                .collect(),
        );
        let board = leaderboard(&table, columns::AUTHOR, 30).unwrap();
        assert_eq!(board.pairs(), vec![("x", 2), ("y", 2), ("z", 2)]);
    }

    #[test]
    fn test_leaderboard_where_filters_rows() {
        let table = cleaned(
            &[columns::AUTHOR, columns::HAS_MEDIA],
            vec![
                vec![Value::text("A"), Value::Bool(true)],
                vec![Value::text("B"), Value::Bool(false)],
                vec![Value::text("B"), Value::Bool(false)],
            ],
        );
        let board = leaderboard_where(&table, columns::AUTHOR, 10, |r| {
            r.row.flag(columns::HAS_MEDIA) == Some(true)
        })
        .unwrap();
        assert_eq!(board.pairs(), vec![("A", 1)]);
    }

    #[test]
    fn test_leaderboard_unknown_column() {
        let table = cleaned(&[columns::AUTHOR], vec![]);
        assert_eq!(
            leaderboard(&table, "state", 5),
            Err(QueryError::ColumnNotFound("state".into()))
        );
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.youtube.com/watch?v=1"), Some("youtube.com"));
        assert_eq!(extract_domain("http://user@t.me:443/x"), Some("t.me"));
        assert_eq!(extract_domain("example.org/path"), Some("example.org"));
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn test_extract_domain_ignores_at_sign_after_authority() {
        assert_eq!(
            extract_domain("https://news.example.com/share?by=user@mail.com"),
            Some("news.example.com")
        );
        assert_eq!(extract_domain("https://t.me/joinchat?ref=a@b"), Some("t.me"));
        assert_eq!(extract_domain("https://user@www.example.com/x"), Some("example.com"));
    }

    #[test]
    fn test_spread_across_groups() {
        let table = cleaned(
            &[columns::TEXT, columns::GROUP],
            vec![
                vec![Value::text("hi"), Value::text("g1")],
                vec![Value::text("hi"), Value::text("g2")],
                vec![Value::text("hi"), Value::text("g2")],
                vec![Value::text("bye"), Value::text("g1")],
            ],
        );
        let board = spread_across_groups(&table, 5).unwrap();
        assert_eq!(board.pairs(), vec![("hi", 2), ("bye", 1)]);
    }

    #[test]
    fn test_repeated_by_author() {
        let table = cleaned(
            &[columns::AUTHOR, columns::TEXT, columns::GROUP],
            vec![
                vec![Value::text("u1"), Value::text("vote"), Value::text("g1")],
                vec![Value::text("u1"), Value::text("vote"), Value::text("g2")],
                vec![Value::text("u1"), Value::text("vote"), Value::text("g2")],
                vec![Value::text("u2"), Value::text("hi"), Value::text("g1")],
                vec![Value::text("u2"), Value::text("hi"), Value::text("g1")],
                vec![Value::text("u3"), Value::text("solo"), Value::text("g1")],
            ],
        );

        let by_posts = repeated_by_author(&table, RepeatRanking::ByPosts, 10).unwrap();
        assert_eq!(by_posts.len(), 2);
        assert_eq!((by_posts[0].author.as_str(), by_posts[0].posts), ("u1", 3));
        assert_eq!((by_posts[1].author.as_str(), by_posts[1].posts), ("u2", 2));

        let by_groups = repeated_by_author(&table, RepeatRanking::ByGroups, 10).unwrap();
        assert_eq!(by_groups.len(), 1);
        assert_eq!(by_groups[0].groups, 2);
    }
}
