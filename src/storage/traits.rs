//! Storage trait definitions

use crate::table::CleanedTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No snapshot has been saved")]
    NoSnapshot,

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Headline counts of a stored snapshot.
///
/// Counts over a column the snapshot does not carry are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// RFC 3339 time the snapshot was saved
    pub taken_at: Option<String>,
    pub total_messages: u64,
    pub distinct_users: Option<u64>,
    pub distinct_groups: Option<u64>,
    pub text_only: Option<u64>,
    pub with_media: Option<u64>,
}

/// Trait for snapshot storage backends
///
/// Implementations must be thread-safe (Send + Sync).
pub trait SnapshotStore: Send + Sync {
    /// Replace the stored snapshot with `table`. Returns the rows written.
    fn save_snapshot(&self, table: &CleanedTable) -> StorageResult<usize>;

    /// Column names of the stored snapshot, in table order
    fn snapshot_columns(&self) -> StorageResult<Vec<String>>;

    /// Headline counts of the stored snapshot
    fn summary(&self) -> StorageResult<SnapshotSummary>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: SnapshotStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Open an in-memory store (for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
