//! Plant inventory data layer.
//!
//! Three pieces, leaf first:
//!
//! - [`contract`]: table name, columns, and the collection/item addressing
//!   scheme.
//! - [`PlantDb`]: the storage engine. Owns the single `plants` table in a
//!   local SQLite file and creates it on first use.
//! - [`PlantStore`]: the record store. Resolves addresses, validates field
//!   sets, dispatches to the engine and notifies subscribers of changes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use plantstock_db::{AddressMatcher, FieldSet, PlantDb, PlantStore, StoreConfig};
//!
//! let db = PlantDb::open(&StoreConfig::sqlite("plants.db")).await?;
//! let store = PlantStore::new(db, AddressMatcher::default());
//!
//! let fern = store
//!     .create(
//!         FieldSet::new()
//!             .name("Fern")
//!             .price(4.5)
//!             .quantity(12)
//!             .supplier_name("Greenhouse Ltd")
//!             .supplier_email("orders@greenhouse.test"),
//!     )
//!     .await?;
//! let rows = store.read(fern, None, None, None).await?;
//! ```

mod config;
pub mod contract;
mod engine;
mod error;
pub mod filter;
mod notify;
mod schema;
mod store;
mod types;
mod validation;

pub use config::StoreConfig;
pub use contract::{Address, AddressMatcher, Column, ToAddress};
pub use error::{DbError, Result};
pub use filter::{CompareOp, Direction, Filter, Sort};
pub use notify::ChangeStream;
pub use schema::SCHEMA_VERSION;
pub use store::PlantStore;
pub use types::*;

use sqlx::sqlite::SqlitePool;
use std::path::Path;
use tracing::info;

/// Storage engine handle for the plants table.
///
/// Cheap to clone; clones share the connection pool, which serializes
/// access to the table.
#[derive(Clone)]
pub struct PlantDb {
    pool: SqlitePool,
}

impl PlantDb {
    /// Open or create a database from configuration.
    ///
    /// Creates the table if it doesn't exist. Safe to call repeatedly on the
    /// same file.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let pool = config.connect().await?;
        let db = Self { pool };

        db.ensure_schema().await?;

        info!(url = %config.url, "Database opened");

        Ok(db)
    }

    /// Open or create a database file, creating its parent directory.
    pub async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::StorageUnavailable(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        Self::open(&StoreConfig::sqlite(path)).await
    }

    /// Open an existing database file (fails if it does not exist).
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DbError::StorageUnavailable(format!(
                "Database not found: {}",
                path.display()
            )));
        }

        Self::open(&StoreConfig::sqlite(path)).await
    }

    /// Get the underlying connection pool (escape hatch for tests and tools).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nested").join("plants.db");

        let db = PlantDb::open_path(&db_path).await.unwrap();
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn test_open_existing_fails_if_not_exists() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nonexistent.db");

        let result = PlantDb::open_existing(&db_path).await;
        assert!(matches!(result, Err(DbError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_open_path_under_a_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = PlantDb::open_path(blocker.join("sub").join("plants.db")).await;
        assert!(matches!(result, Err(DbError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("plants.db");

        let db = PlantDb::open_path(&db_path).await.unwrap();
        db.close().await;

        let db = PlantDb::open_existing(&db_path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), SCHEMA_VERSION);
        db.close().await;
    }
}
