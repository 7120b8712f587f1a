//! Storage collaborators
//!
//! The pipeline itself never touches disk. Loaders build a
//! [`RawTable`](crate::table::RawTable) and snapshot stores persist a
//! cleaned, derived table through the [`SnapshotStore`] trait. The primary
//! implementation is [`SqliteStore`].

mod jsonl;
mod sqlite;
mod traits;

pub use jsonl::{canonical_name, load_jsonl, read_jsonl, FIELD_ALIASES};
pub use sqlite::SqliteStore;
pub use traits::{OpenStore, SnapshotStore, SnapshotSummary, StorageError, StorageResult};
