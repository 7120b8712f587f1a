//! Timestamp parsing and time bucketing

use super::types::{require_columns, QueryResult};
use crate::table::{columns, CleanedTable, RowId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A timestamp cell that could not be parsed. The row is left out of
/// temporal aggregation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("row {row}: malformed timestamp '{value}'")]
pub struct MalformedTimestamp {
    pub row: RowId,
    pub value: String,
}

/// Parse an export timestamp.
///
/// Accepts RFC 3339 (wall-clock time as written, offset dropped),
/// `YYYY-MM-DD HH:MM:SS` with optional fraction and `T` separator, and a
/// bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Hour,
}

impl Granularity {
    fn floor(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let date = ts.date();
        let hour = match self {
            Granularity::Day => 0,
            Granularity::Hour => ts.hour(),
        };
        date.and_hms_opt(hour, 0, 0).unwrap_or(ts)
    }

    fn label(&self, start: NaiveDateTime) -> String {
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Hour => start.format("%Y-%m-%d %H:00").to_string(),
        }
    }
}

/// Messages in one time bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: NaiveDateTime,
    pub label: String,
    pub count: u64,
}

/// Bucketed message counts in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCounts {
    pub granularity: Granularity,
    pub buckets: Vec<TimeBucket>,
    /// Bucket with the most messages; the earliest wins ties
    pub peak: Option<TimeBucket>,
    pub malformed: Vec<MalformedTimestamp>,
}

/// Parsed timestamps of the table plus the cells that failed to parse.
/// Null cells are neither.
fn parsed_timestamps(table: &CleanedTable) -> (Vec<NaiveDateTime>, Vec<MalformedTimestamp>) {
    let mut parsed = Vec::with_capacity(table.len());
    let mut malformed = Vec::new();
    for row in table.rows() {
        let cell = row.row.get(columns::TIMESTAMP);
        if cell.is_null() {
            continue;
        }
        match cell.as_str().and_then(parse_timestamp) {
            Some(ts) => parsed.push(ts),
            None => malformed.push(MalformedTimestamp {
                row: row.id(),
                value: cell.to_string(),
            }),
        }
    }
    (parsed, malformed)
}

/// Count messages per day or hour of the `timestamp` column
pub fn bucket_counts(table: &CleanedTable, granularity: Granularity) -> QueryResult<TemporalCounts> {
    require_columns(table, &[columns::TIMESTAMP])?;
    let (parsed, malformed) = parsed_timestamps(table);

    let mut counts: BTreeMap<NaiveDateTime, u64> = BTreeMap::new();
    for ts in parsed {
        *counts.entry(granularity.floor(ts)).or_insert(0) += 1;
    }

    let buckets: Vec<TimeBucket> = counts
        .into_iter()
        .map(|(start, count)| TimeBucket {
            label: granularity.label(start),
            start,
            count,
        })
        .collect();

    let mut peak: Option<&TimeBucket> = None;
    for bucket in &buckets {
        if peak.map_or(true, |p| bucket.count > p.count) {
            peak = Some(bucket);
        }
    }
    let peak = peak.cloned();

    if !malformed.is_empty() {
        tracing::debug!(malformed = malformed.len(), "timestamps excluded from bucketing");
    }

    Ok(TemporalCounts {
        granularity,
        buckets,
        peak,
        malformed,
    })
}

/// Message counts per hour of day, 0 through 23
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourProfile {
    /// Always 24 entries, index = hour
    pub counts: Vec<u64>,
    pub malformed: usize,
}

/// Daily activity pattern over the `timestamp` column
pub fn hour_of_day_profile(table: &CleanedTable) -> QueryResult<HourProfile> {
    require_columns(table, &[columns::TIMESTAMP])?;
    let (parsed, malformed) = parsed_timestamps(table);
    let mut counts = vec![0u64; 24];
    for ts in parsed {
        counts[ts.hour() as usize] += 1;
    }
    Ok(HourProfile {
        counts,
        malformed: malformed.len(),
    })
}
