//! Aggregations over a cleaned message table
//!
//! Every query is a pure function of a [`CleanedTable`](crate::table::CleanedTable)
//! and its arguments. Queries never depend on each other, so they can run in
//! any order, and a failing one leaves the rest untouched.

mod association;
mod counts;
mod leaderboard;
mod misinformation;
mod normality;
mod summary;
mod temporal;
mod text;
mod types;

pub use association::{cramers_v, cramers_v_matrix, pearson_matrix, sample_rows, NULL_CATEGORY};
pub use counts::{crosstab, distinct_count, group_counts, group_counts_where, total_rows};
pub use leaderboard::{
    domain_leaderboard, extract_domain, leaderboard, leaderboard_where, repeated_by_author,
    spread_across_groups, top_texts, RepeatRanking, RepeatedMessage,
};
pub use misinformation::{
    misinformation_counts, misinformation_crosstab, MisinformationBands, MisinformationCategory,
};
pub use normality::{normality_test, shapiro_wilk, NormalityOutcome, NormalitySkip, ShapiroWilk};
pub use summary::{frequency_table, numeric_columns, numeric_summary, numeric_values, FrequencyTable, NumericSummary};
pub use temporal::{
    bucket_counts, hour_of_day_profile, parse_timestamp, Granularity, HourProfile,
    MalformedTimestamp, TemporalCounts, TimeBucket,
};
pub use text::{
    author_sentiment_extremes, author_sentiment_totals, distinct_texts_by_sentiment,
    length_extremes, search_text, AuthorScore, LengthExtremes, SentimentExtremes, TextMatch,
};
pub use types::{
    AggregationResult, GroupedCounts, Leaderboard, LeaderboardEntry, Matrix, QueryError,
    QueryResult,
};
