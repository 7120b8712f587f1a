//! Flag/value consistency checks
//!
//! Observational only: checks count contradictions between a presence flag
//! and the value it describes, and never remove rows.

use crate::table::{columns, DerivedRow, RowId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of row ids kept as a sample per finding
pub const SAMPLE_SIZE: usize = 5;

/// Where in the pipeline a check was run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationPoint {
    PreFilter,
    PostFilter,
}

impl fmt::Display for ObservationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationPoint::PreFilter => f.write_str("pre-filter"),
            ObservationPoint::PostFilter => f.write_str("post-filter"),
        }
    }
}

/// The four flag/value contradictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyCheck {
    MediaFlagWithoutType,
    MediaTypeWithoutFlag,
    UrlFlagWithoutUrl,
    UrlWithoutFlag,
}

impl ConsistencyCheck {
    pub const ALL: [ConsistencyCheck; 4] = [
        ConsistencyCheck::MediaFlagWithoutType,
        ConsistencyCheck::MediaTypeWithoutFlag,
        ConsistencyCheck::UrlFlagWithoutUrl,
        ConsistencyCheck::UrlWithoutFlag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConsistencyCheck::MediaFlagWithoutType => "has_media is true but media_type is null",
            ConsistencyCheck::MediaTypeWithoutFlag => "has_media is false but media_type is not null",
            ConsistencyCheck::UrlFlagWithoutUrl => "has_media_url is true but media_url is null",
            ConsistencyCheck::UrlWithoutFlag => "has_media_url is false but media_url is not null",
        }
    }

    /// A row with a null or non-boolean flag never violates a check.
    pub fn violated_by(&self, row: &DerivedRow) -> bool {
        let (flag_col, value_col, flag_expected) = match self {
            ConsistencyCheck::MediaFlagWithoutType => (columns::HAS_MEDIA, columns::MEDIA_TYPE, true),
            ConsistencyCheck::MediaTypeWithoutFlag => (columns::HAS_MEDIA, columns::MEDIA_TYPE, false),
            ConsistencyCheck::UrlFlagWithoutUrl => (columns::HAS_MEDIA_URL, columns::MEDIA_URL, true),
            ConsistencyCheck::UrlWithoutFlag => (columns::HAS_MEDIA_URL, columns::MEDIA_URL, false),
        };
        match row.row.flag(flag_col) {
            Some(flag) if flag == flag_expected => {
                // flag true expects a value; flag false expects none
                row.row.get(value_col).is_null() == flag
            }
            _ => false,
        }
    }
}

/// A non-fatal data inconsistency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyFinding {
    pub check: ConsistencyCheck,
    pub observed_at: ObservationPoint,
    pub row_count: usize,
    /// First few offending row ids
    pub sample: Vec<RowId>,
}

impl ConsistencyFinding {
    pub fn describe(&self) -> String {
        format!("[{}] {}: {} rows", self.observed_at, self.check.name(), self.row_count)
    }
}

/// Run every check over `rows`. One finding per check, including checks
/// with zero offending rows.
pub fn check_consistency(rows: &[DerivedRow], observed_at: ObservationPoint) -> Vec<ConsistencyFinding> {
    ConsistencyCheck::ALL
        .iter()
        .map(|check| {
            let mut row_count = 0;
            let mut sample = Vec::new();
            for row in rows.iter().filter(|r| check.violated_by(r)) {
                row_count += 1;
                if sample.len() < SAMPLE_SIZE {
                    sample.push(row.id());
                }
            }
            ConsistencyFinding {
                check: *check,
                observed_at,
                row_count,
                sample,
            }
        })
        .collect()
}
