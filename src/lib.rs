//! chatscope: exploratory analysis of public messaging exports
//!
//! Turns a raw table of chat messages into a cleaned table with derived
//! features and renders a fixed sequence of aggregations as a Markdown report.
//!
//! # Core Concepts
//!
//! - **Derivation**: per-row features (length, word count, duplicate count,
//!   virality, sentiment) computed once from the raw text
//! - **Filtering**: banned-marker, exact-duplicate and minimum-word filters,
//!   plus consistency checks observed before and after filtering
//! - **Queries**: pure aggregations over the cleaned table; a failing query
//!   never affects another
//! - **Report**: an append-only block document with deterministic Markdown
//!   output
//!
//! # Example
//!
//! ```
//! use chatscope::{Pipeline, PipelineConfig, RawTable};
//!
//! let mut raw = RawTable::new(["author", "text"]);
//! raw.push_pairs([("author", "u1"), ("text", "bom dia a todos do grupo")]);
//!
//! let output = Pipeline::new(PipelineConfig::default())?.run(&raw)?;
//! assert_eq!(output.prepared.cleaned.len(), 1);
//! assert!(output.report.serialize().starts_with("# Exploratory Data Analysis Report"));
//! # Ok::<(), chatscope::PipelineError>(())
//! ```

pub mod config;
pub mod derive;
pub mod filter;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod storage;
pub mod table;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, PipelineConfig};
pub use derive::{derive_features, FeatureDeriver};
pub use filter::{check_consistency, ConsistencyFinding, FilterPolicy, FilterReport, ObservationPoint};
pub use pipeline::{build_report, Pipeline, PipelineError, PipelineOutput, PipelineResult, PreparedData};
pub use query::{QueryError, QueryResult};
pub use report::{render_markdown, Block, ReportDocument, ReportTable};
pub use storage::{load_jsonl, OpenStore, SnapshotStore, SnapshotSummary, SqliteStore, StorageError, StorageResult};
pub use table::{CleanedTable, DerivedRow, RawTable, Row, RowId, SchemaError, SentimentClass, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
