//! Common fixtures for chatscope integration tests
//!
//! `fixtures/messages.jsonl` is a small export using the public dataset's
//! field names. It holds eight messages: one banned, one too short, one
//! exact duplicate and one with a malformed timestamp.

#![allow(dead_code)]

use chatscope::{load_jsonl, PipelineConfig, RawTable, Value};
use std::path::PathBuf;

/// Rows in the fixture export
pub const FIXTURE_ROWS: usize = 8;

/// Rows left after the default filter policy
pub const FIXTURE_CLEANED_ROWS: usize = 5;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("messages.jsonl")
}

/// The fixture export, loaded through the JSON Lines loader
pub fn fixture_table() -> RawTable {
    load_jsonl(fixture_path()).expect("fixture loads")
}

/// Default config with charts under a test directory
pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        images_dir: "charts".to_string(),
        ..Default::default()
    }
}

/// Single-column raw table of message texts
pub fn texts(values: &[Option<&str>]) -> RawTable {
    let mut table = RawTable::new(["text"]);
    for text in values {
        table.push_pairs([("text", Value::from(*text))]);
    }
    table
}
