// crates/lapboard-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Score Store
// Description: Durable ScoreStore backed by SQLite WAL.
// Purpose: Persist score records with deterministic ordering and eviction.
// Dependencies: lapboard-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ScoreStore`] using `SQLite`. Inserts,
//! capacity enforcement, and reads each run in their own transaction on a
//! single shared connection. The schema version is recorded in `store_meta`
//! and unknown versions fail closed.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use lapboard_core::Clock;
use lapboard_core::PlayerId;
use lapboard_core::ScoreFilter;
use lapboard_core::ScoreId;
use lapboard_core::ScoreRecord;
use lapboard_core::ScoreStore;
use lapboard_core::ScoreSubmission;
use lapboard_core::StoreError;
use lapboard_core::SystemClock;
use lapboard_core::Timestamp;
use lapboard_core::TrackId;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` score store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or arguments.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed score store with WAL support.
#[derive(Clone)]
pub struct SqliteScoreStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Time source for `createdAt`.
    clock: Arc<dyn Clock>,
}

impl SqliteScoreStore {
    /// Opens an `SQLite`-backed score store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source used for `createdAt`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Inserts a record inside a single transaction.
    fn insert_record(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, SqliteStoreError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let latest: Option<i64> =
            tx.query_row("SELECT MAX(created_at_ms) FROM scores", params![], |row| row.get(0))?;
        let created_at =
            latest.map_or(now, |latest| Timestamp::from_unix_millis(latest).max(now));
        let record = ScoreRecord::from_submission(ScoreId::generate(), submission, created_at);
        tx.execute(
            "INSERT INTO scores (id, player_name, player_id, chrono, track_id, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.as_str(),
                record.player_name,
                record.player_id.as_str(),
                record.chrono,
                record.track_id.as_str(),
                record.created_at.as_unix_millis()
            ],
        )?;
        tx.commit()?;
        drop(guard);
        Ok(record)
    }

    /// Deletes the oldest records beyond `max_records` inside one transaction.
    fn evict_oldest(&self, max_records: u64) -> Result<u64, SqliteStoreError> {
        let max_records = i64::try_from(max_records)
            .map_err(|_| SqliteStoreError::Invalid("max_records too large".to_string()))?;
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM scores", params![], |row| row.get(0))?;
        let excess = count.saturating_sub(max_records);
        if excess <= 0 {
            tx.commit()?;
            return Ok(0);
        }
        let deleted = tx.execute(
            "DELETE FROM scores WHERE seq IN (SELECT seq FROM scores ORDER BY created_at_ms ASC, \
             seq ASC LIMIT ?1)",
            params![excess],
        )?;
        let deleted = u64::try_from(deleted)
            .map_err(|_| SqliteStoreError::Invalid("eviction count overflow".to_string()))?;
        if i64::try_from(deleted).ok() != Some(excess) {
            return Err(SqliteStoreError::Corrupt(format!(
                "evicted {deleted} records, expected {excess}"
            )));
        }
        tx.commit()?;
        drop(guard);
        Ok(deleted)
    }

    /// Reads ranked records matching `filter`.
    fn select_ranked(
        &self,
        filter: &ScoreFilter,
        limit: usize,
    ) -> Result<Vec<ScoreRecord>, SqliteStoreError> {
        if limit == 0 {
            return Err(SqliteStoreError::Invalid(
                "query limit must be greater than zero".to_string(),
            ));
        }
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("query limit too large".to_string()))?;
        let mut sql = String::from(
            "SELECT id, player_name, player_id, chrono, track_id, created_at_ms FROM scores WHERE \
             1 = 1",
        );
        let mut values: Vec<Value> = Vec::new();
        if let Some(track_id) = &filter.track_id {
            values.push(Value::Text(track_id.as_str().to_string()));
            sql.push_str(&format!(" AND track_id = ?{}", values.len()));
        }
        if let Some(player_id) = &filter.player_id {
            values.push(Value::Text(player_id.as_str().to_string()));
            sql.push_str(&format!(" AND player_id = ?{}", values.len()));
        }
        values.push(Value::Integer(limit));
        sql.push_str(&format!(
            " ORDER BY chrono ASC, created_at_ms ASC, seq ASC LIMIT ?{}",
            values.len()
        ));

        let guard = self.lock()?;
        let mut statement = guard.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(values.iter()), |row| {
            Ok(ScoreRecord {
                id: ScoreId::new(row.get::<_, String>(0)?),
                player_name: row.get(1)?,
                player_id: PlayerId::new(row.get::<_, String>(2)?),
                chrono: row.get(3)?,
                track_id: TrackId::new(row.get::<_, String>(4)?),
                created_at: Timestamp::from_unix_millis(row.get(5)?),
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        drop(statement);
        drop(guard);
        Ok(records)
    }

    /// Counts stored records.
    fn count_records(&self) -> Result<u64, SqliteStoreError> {
        let guard = self.lock()?;
        let count: i64 =
            guard.query_row("SELECT COUNT(*) FROM scores", params![], |row| row.get(0))?;
        drop(guard);
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Corrupt("negative record count".to_string()))
    }
}

impl ScoreStore for SqliteScoreStore {
    fn insert(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, StoreError> {
        self.insert_record(submission).map_err(StoreError::from)
    }

    fn enforce_capacity(&self, max_records: u64) -> Result<u64, StoreError> {
        self.evict_oldest(max_records).map_err(StoreError::from)
    }

    fn query(&self, filter: &ScoreFilter, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        self.select_ranked(filter, limit).map_err(StoreError::from)
    }

    fn count(&self) -> Result<u64, StoreError> {
        self.count_records().map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.trim().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must be non-empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))?;
    connection.busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS scores (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    id TEXT NOT NULL UNIQUE,
                    player_name TEXT NOT NULL,
                    player_id TEXT NOT NULL,
                    chrono INTEGER NOT NULL,
                    track_id TEXT NOT NULL,
                    created_at_ms INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_scores_created_at
                    ON scores (created_at_ms, seq);
                CREATE INDEX IF NOT EXISTS idx_scores_track_chrono
                    ON scores (track_id, chrono);
                CREATE INDEX IF NOT EXISTS idx_scores_player_chrono
                    ON scores (player_id, chrono);",
            )?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit()?;
    Ok(())
}
