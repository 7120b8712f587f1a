//! SQLite snapshot store

use super::traits::{OpenStore, SnapshotStore, SnapshotSummary, StorageError, StorageResult};
use crate::table::{columns, CleanedTable, Value};
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Table holding the most recent snapshot
const MESSAGES: &str = "messages";

/// Primary key column, holds the row id assigned at load time
const ROW_ID: &str = "snapshot_row";

/// SQLite-backed snapshot store
///
/// The `messages` table is recreated on every save with one column per
/// table column, raw fields first and derived features after. A
/// `snapshots` log records when each save happened.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                taken_at TEXT NOT NULL,
                row_count INTEGER NOT NULL,
                column_count INTEGER NOT NULL
            );

            -- Enable WAL mode so summaries can read during a save
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Quote an identifier; column names come from the data
    fn quote(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn to_sql(value: &Value) -> SqlValue {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Int(i) => SqlValue::Integer(*i),
            Value::Float(f) => SqlValue::Real(*f),
            Value::Text(s) => SqlValue::Text(s.clone()),
        }
    }

    /// Columns of the messages table, key column included. Empty when no
    /// snapshot exists.
    fn table_columns(conn: &Connection) -> StorageResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let names = stmt
            .query_map(params![MESSAGES], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn count(conn: &Connection, sql: &str) -> StorageResult<u64> {
        let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SnapshotStore for SqliteStore {
    fn save_snapshot(&self, table: &CleanedTable) -> StorageResult<usize> {
        let columns = table.columns();
        let quoted: Vec<String> = std::iter::once(ROW_ID)
            .chain(columns.iter().map(String::as_str))
            .map(Self::quote)
            .collect();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut definitions = quoted.clone();
        definitions[0] = format!("{} INTEGER PRIMARY KEY", quoted[0]);
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({defs});",
            table = MESSAGES,
            defs = definitions.join(", ")
        ))?;

        {
            let placeholders = vec!["?"; quoted.len()].join(", ");
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                MESSAGES,
                quoted.join(", "),
                placeholders
            ))?;
            for row in table.rows() {
                let values = std::iter::once(SqlValue::Integer(row.id().index() as i64))
                    .chain(columns.iter().map(|c| Self::to_sql(&row.value(c))));
                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.execute(
            "INSERT INTO snapshots (taken_at, row_count, column_count) VALUES (?1, ?2, ?3)",
            params![Utc::now().to_rfc3339(), table.len() as i64, columns.len() as i64],
        )?;
        tx.commit()?;

        info!(rows = table.len(), columns = columns.len(), "snapshot saved");
        Ok(table.len())
    }

    fn snapshot_columns(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut names = Self::table_columns(&conn)?;
        if names.is_empty() {
            return Err(StorageError::NoSnapshot);
        }
        names.retain(|n| n != ROW_ID);
        Ok(names)
    }

    fn summary(&self) -> StorageResult<SnapshotSummary> {
        let conn = self.conn()?;
        let names = Self::table_columns(&conn)?;
        if names.is_empty() {
            return Err(StorageError::NoSnapshot);
        }
        let has = |column: &str| names.iter().any(|n| n == column);

        let distinct = |column: &str| -> StorageResult<Option<u64>> {
            if !has(column) {
                debug!(column, "summary column absent");
                return Ok(None);
            }
            let sql = format!("SELECT COUNT(DISTINCT {}) FROM {}", Self::quote(column), MESSAGES);
            Self::count(&conn, &sql).map(Some)
        };

        let media = |flag: bool| -> StorageResult<Option<u64>> {
            if !has(columns::HAS_MEDIA) {
                return Ok(None);
            }
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {} = {}",
                MESSAGES,
                Self::quote(columns::HAS_MEDIA),
                i64::from(flag)
            );
            Self::count(&conn, &sql).map(Some)
        };

        let taken_at: Option<String> = conn
            .query_row(
                "SELECT taken_at FROM snapshots ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(SnapshotSummary {
            taken_at,
            total_messages: Self::count(&conn, &format!("SELECT COUNT(*) FROM {}", MESSAGES))?,
            distinct_users: distinct(columns::AUTHOR)?,
            distinct_groups: distinct(columns::GROUP)?,
            text_only: media(false)?,
            with_media: media(true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cleaned;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn messages() -> CleanedTable {
        let row = |author: &str, group: &str, media: bool, text: &str| {
            vec![Value::text(author), Value::text(group), Value::Bool(media), Value::text(text)]
        };
        cleaned(
            &[columns::AUTHOR, columns::GROUP, columns::HAS_MEDIA, columns::TEXT],
            vec![
                row("u1", "g1", false, "bom dia"),
                row("u1", "g2", true, "bom dia"),
                row("u2", "g1", false, "ruim"),
            ],
        )
    }

    #[test]
    fn test_summary_before_save_fails() {
        let store = create_test_store();
        assert!(matches!(store.summary(), Err(StorageError::NoSnapshot)));
        assert!(matches!(store.snapshot_columns(), Err(StorageError::NoSnapshot)));
    }

    #[test]
    fn test_save_and_summarize() {
        let store = create_test_store();
        assert_eq!(store.save_snapshot(&messages()).unwrap(), 3);

        let summary = store.summary().unwrap();
        assert_eq!(summary.total_messages, 3);
        assert_eq!(summary.distinct_users, Some(2));
        assert_eq!(summary.distinct_groups, Some(2));
        assert_eq!(summary.text_only, Some(2));
        assert_eq!(summary.with_media, Some(1));
        assert!(summary.taken_at.is_some());
    }

    #[test]
    fn test_snapshot_keeps_derived_columns() {
        let store = create_test_store();
        store.save_snapshot(&messages()).unwrap();
        let names = store.snapshot_columns().unwrap();
        assert_eq!(names, messages().columns());
        assert!(names.iter().any(|n| n == columns::DUPLICATE_COUNT));

        let conn = store.conn.lock().unwrap();
        let viral: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM messages WHERE is_viral = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(viral, 2);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let store = create_test_store();
        store.save_snapshot(&messages()).unwrap();
        let texts = crate::test_support::texts(&[Some("só texto")]);
        store.save_snapshot(&texts).unwrap();

        let summary = store.summary().unwrap();
        assert_eq!(summary.total_messages, 1);
        assert_eq!(summary.distinct_users, None);
        assert_eq!(summary.with_media, None);
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("chatscope.db");
        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.save_snapshot(&messages()).unwrap();
        }
        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.summary().unwrap().total_messages, 3);
    }

    #[test]
    fn test_wal_mode_enabled_at_connection() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("wal.db")).unwrap();
        let journal_mode: String = store
            .conn
            .lock()
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode, "wal");
    }

    #[test]
    fn test_quote_escapes_identifiers() {
        assert_eq!(SqliteStore::quote("group"), "\"group\"");
        assert_eq!(SqliteStore::quote("a\"b"), "\"a\"\"b\"");
    }
}
