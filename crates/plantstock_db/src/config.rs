//! Store configuration.
//!
//! SQLite only. Connection tuning (journal mode, sync level, busy timeout)
//! is applied through connect options so every pooled connection gets it,
//! not only the first one.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::error::{DbError, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum connections in the pool
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,
    in_memory: bool,
}

impl StoreConfig {
    /// SQLite file at `path`, created if missing.
    pub fn sqlite(path: impl AsRef<Path>) -> Self {
        Self {
            url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            in_memory: false,
        }
    }

    /// In-memory SQLite (for testing).
    ///
    /// Every SQLite connection to `:memory:` is its own database, so the pool
    /// is pinned to one connection that is never recycled.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            in_memory: true,
        }
    }

    /// Set maximum connections. Ignored for in-memory stores.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        if !self.in_memory {
            self.max_connections = max.max(1);
        }
        self
    }

    /// Set busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// Build the pool. Connection failures surface as `StorageUnavailable`.
    pub(crate) async fn connect(&self) -> Result<SqlitePool> {
        let mut options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DbError::StorageUnavailable(format!("{}: {}", self.url, e)))?
            .busy_timeout(self.busy_timeout)
            .synchronous(SqliteSynchronous::Normal);
        if !self.in_memory {
            options = options
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new().max_connections(self.max_connections);
        if self.in_memory {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::StorageUnavailable(format!("{}: {}", self.url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_pins_single_connection() {
        let config = StoreConfig::sqlite_memory().with_max_connections(8);
        assert_eq!(config.max_connections, 1);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_sqlite_url() {
        let config = StoreConfig::sqlite("/tmp/plants.db");
        assert_eq!(config.url, "sqlite:/tmp/plants.db?mode=rwc");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[tokio::test]
    async fn test_unopenable_path_is_storage_unavailable() {
        let tmp = tempfile::TempDir::new().unwrap();
        // SQLite does not create missing parent directories.
        let config = StoreConfig::sqlite(tmp.path().join("missing").join("plants.db"));
        let err = config.connect().await.unwrap_err();
        assert!(matches!(err, DbError::StorageUnavailable(_)));
    }
}
