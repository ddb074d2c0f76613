// lingua-relay-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Relay Store
// Description: Durable RelayStore backed by SQLite WAL.
// Purpose: Persist request and translation key snapshots across restarts.
// Dependencies: lingua-relay-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`RelayStore`] using `SQLite`. Requests
//! and translation keys are stored as JSON snapshots, one row per entity,
//! replaced on save. The request `status` is mirrored into its own indexed
//! column so the startup-recovery scan for incomplete requests never parses
//! snapshots it does not need. Schema versioning fails closed: an unknown
//! version refuses to open rather than guessing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use lingua_relay_core::RelayStore;
use lingua_relay_core::RequestId;
use lingua_relay_core::StoreError;
use lingua_relay_core::TranslationKey;
use lingua_relay_core::TranslationRequest;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum entity snapshot size accepted by the store.
pub const MAX_SNAPSHOT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
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

/// Configuration for the `SQLite` relay store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

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
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Snapshot exceeded configured size limits.
    #[error("sqlite store snapshot too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual snapshot size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Serialization(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Serialization(format!(
                "snapshot exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed relay store with WAL support.
#[derive(Clone, Debug)]
pub struct SqliteRelayStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRelayStore {
    /// Opens an `SQLite`-backed relay store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or when its schema version is unsupported.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }
}

#[async_trait]
impl RelayStore for SqliteRelayStore {
    async fn save_request(&self, request: &TranslationRequest) -> Result<(), StoreError> {
        let snapshot = encode_snapshot(request)?;
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO requests (request_id, status, request_json, saved_at) VALUES (?1, \
                 ?2, ?3, ?4) ON CONFLICT(request_id) DO UPDATE SET status = excluded.status, \
                 request_json = excluded.request_json, saved_at = excluded.saved_at",
                params![request.id.as_str(), request.status.as_str(), snapshot, unix_millis()],
            )
            .map_err(db_error)?;
        Ok(())
    }

    async fn request(&self, id: &RequestId) -> Result<Option<TranslationRequest>, StoreError> {
        let bytes: Option<Vec<u8>> = {
            let guard = self.lock()?;
            guard
                .query_row(
                    "SELECT request_json FROM requests WHERE request_id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_error)?
        };
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let request: TranslationRequest = decode_snapshot(&bytes)?;
        if request.id != *id {
            return Err(StoreError::Corrupt(
                "request_id mismatch between key and payload".to_string(),
            ));
        }
        Ok(Some(request))
    }

    async fn incomplete_requests(&self) -> Result<Vec<TranslationRequest>, StoreError> {
        let rows: Vec<Vec<u8>> = {
            let guard = self.lock()?;
            let mut statement = guard
                .prepare(
                    "SELECT request_json FROM requests WHERE status IN ('pending', \
                     'processing') ORDER BY saved_at",
                )
                .map_err(db_error)?;
            let mapped = statement
                .query_map(params![], |row| row.get::<_, Vec<u8>>(0))
                .map_err(db_error)?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row.map_err(db_error)?);
            }
            rows
        };
        let mut requests = Vec::with_capacity(rows.len());
        for bytes in rows {
            requests.push(decode_snapshot(&bytes)?);
        }
        Ok(requests)
    }

    async fn save_key(&self, key: &TranslationKey) -> Result<(), StoreError> {
        let snapshot = encode_snapshot(key)?;
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO translation_keys (key, key_json, saved_at) VALUES (?1, ?2, ?3) ON \
                 CONFLICT(key) DO UPDATE SET key_json = excluded.key_json, saved_at = \
                 excluded.saved_at",
                params![key.key, snapshot, unix_millis()],
            )
            .map_err(db_error)?;
        Ok(())
    }

    async fn key(&self, name: &str) -> Result<Option<TranslationKey>, StoreError> {
        let bytes: Option<Vec<u8>> = {
            let guard = self.lock()?;
            guard
                .query_row(
                    "SELECT key_json FROM translation_keys WHERE key = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_error)?
        };
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let key: TranslationKey = decode_snapshot(&bytes)?;
        if key.key != name {
            return Err(StoreError::Corrupt("key mismatch between row and payload".to_string()));
        }
        Ok(Some(key))
    }

    async fn all_keys(&self) -> Result<Vec<TranslationKey>, StoreError> {
        let rows: Vec<Vec<u8>> = {
            let guard = self.lock()?;
            let mut statement = guard
                .prepare("SELECT key_json FROM translation_keys ORDER BY key")
                .map_err(db_error)?;
            let mapped = statement
                .query_map(params![], |row| row.get::<_, Vec<u8>>(0))
                .map_err(db_error)?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row.map_err(db_error)?);
            }
            rows
        };
        let mut keys = Vec::with_capacity(rows.len());
        for bytes in rows {
            keys.push(decode_snapshot(&bytes)?);
        }
        Ok(keys)
    }

    async fn key_exists(&self, name: &str) -> Result<bool, StoreError> {
        let guard = self.lock()?;
        let found: Option<i64> = guard
            .query_row(
                "SELECT 1 FROM translation_keys WHERE key = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        Ok(found.is_some())
    }

    async fn delete_key(&self, name: &str) -> Result<(), StoreError> {
        let guard = self.lock()?;
        guard
            .execute("DELETE FROM translation_keys WHERE key = ?1", params![name])
            .map_err(db_error)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a `rusqlite` error into a store error.
fn db_error(err: rusqlite::Error) -> StoreError {
    SqliteStoreError::Db(err.to_string()).into()
}

/// Serializes an entity snapshot, enforcing the size limit.
fn encode_snapshot<T: serde::Serialize>(entity: &T) -> Result<Vec<u8>, StoreError> {
    let bytes = serde_json::to_vec(entity)
        .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    if bytes.len() > MAX_SNAPSHOT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_SNAPSHOT_BYTES,
            actual_bytes: bytes.len(),
        }
        .into());
    }
    Ok(bytes)
}

/// Deserializes an entity snapshot.
fn decode_snapshot<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes)
        .map_err(|err| SqliteStoreError::Invalid(err.to_string()).into())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Opens an `SQLite` connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS requests (
                    request_id TEXT PRIMARY KEY,
                    status TEXT NOT NULL,
                    request_json BLOB NOT NULL,
                    saved_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_requests_status ON requests (status);
                CREATE TABLE IF NOT EXISTS translation_keys (
                    key TEXT PRIMARY KEY,
                    key_json BLOB NOT NULL,
                    saved_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
