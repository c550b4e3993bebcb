//! # Connection Pool
//!
//! Opens the SQLite store behind every repository and session.
//!
//! ## Storage Targets
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  VENTAS_DB_PATH                                                         │
//! │       │                                                                 │
//! │       ├── "./ventas.db" ──► StorageTarget::File                         │
//! │       │                       WAL journal, synchronous=NORMAL,          │
//! │       │                       file created on first open,               │
//! │       │                       pool of N connections                     │
//! │       │                                                                 │
//! │       └── ":memory:" ─────► StorageTarget::Memory                       │
//! │                               one connection, never recycled            │
//! │                               (each connection would be its own db)     │
//! │                                                                         │
//! │  Both: foreign_keys=ON, embedded migrations applied on open             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! After opening, `db.customers()` / `db.products()` run single statements on
//! the pool, while `db.begin()` hands out a [`DbSession`] for the sale and
//! invoice operations.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::session::DbSession;

/// Path value selecting an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// File connections are recycled after this long.
const FILE_CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 60);

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    File(PathBuf),
    Memory,
}

impl StorageTarget {
    fn describe(&self) -> String {
        match self {
            StorageTarget::File(path) => path.display().to_string(),
            StorageTarget::Memory => IN_MEMORY_PATH.to_string(),
        }
    }
}

/// Pool settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("./ventas.db").max_connections(8);
/// let tests = DbConfig::in_memory();
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub target: StorageTarget,

    /// Upper bound on open connections (5 for files, pinned to 1 in memory).
    pub max_connections: u32,

    /// Connections opened eagerly and kept warm.
    pub min_connections: u32,

    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,

    /// `None` keeps idle connections open indefinitely.
    pub idle_timeout: Option<Duration>,

    /// Apply embedded migrations while opening.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a database file; `:memory:` yields [`DbConfig::in_memory`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == IN_MEMORY_PATH {
            return DbConfig::in_memory();
        }

        DbConfig {
            target: StorageTarget::File(path),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// A private database living only as long as the pool.
    pub fn in_memory() -> Self {
        DbConfig {
            target: StorageTarget::Memory,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Ignored for in-memory targets, which must stay on one connection.
    pub fn max_connections(mut self, max: u32) -> Self {
        if !self.is_in_memory() {
            self.max_connections = max;
        }
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.target == StorageTarget::Memory
    }

    /// File path of the database, if it has one.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            StorageTarget::File(path) => Some(path),
            StorageTarget::Memory => None,
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.target {
            StorageTarget::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            StorageTarget::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };

        // Off by default in SQLite; the schema relies on them.
        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, migrates the schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let target = config.target.describe();
        info!(db = %target, "Opening database");

        let options = config.connect_options()?;
        let lifetime = match config.target {
            StorageTarget::File(_) => Some(FILE_CONNECTION_LIFETIME),
            StorageTarget::Memory => None,
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(lifetime)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{target}: {e}")))?;
        debug!(max = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        info!(db = %target, "Database open");
        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// `(total, applied)` migration counts for this database.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Opens a transaction-scoped session implementing every core port.
    ///
    /// Nothing the session writes is visible to others until
    /// [`DbSession::commit`]; dropping the session rolls back.
    pub async fn begin(&self) -> DbResult<DbSession> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(DbSession::new(tx))
    }

    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// Round-trips a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_applies_migrations() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = db.migration_status().await.unwrap();
        assert!(total > 0);
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_migration_status_without_migrations() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(db.migration_status().await.is_err());

        db.run_migrations().await.unwrap();
        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_file_config() {
        let config = DbConfig::new("/tmp/ventas-test.db")
            .max_connections(8)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert_eq!(config.path(), Some(Path::new("/tmp/ventas-test.db")));
    }

    #[test]
    fn test_memory_path_stays_on_one_connection() {
        let config = DbConfig::new(IN_MEMORY_PATH).max_connections(8);

        assert!(config.is_in_memory());
        assert_eq!(config.path(), None);
        assert_eq!(config.max_connections, 1);
        assert!(config.idle_timeout.is_none());
    }
}
