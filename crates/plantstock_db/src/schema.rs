//! Table creation and schema versioning.
//!
//! The schema version lives in SQLite's `user_version` pragma. Version 1 is
//! the only version that has ever existed.

use crate::contract::TABLE_NAME;
use crate::error::{DbError, Result};
use crate::PlantDb;
use tracing::{info, warn};

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

impl PlantDb {
    /// Ensure the plants table exists and the stored version is current.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        let stored = self.schema_version().await?;
        if stored > SCHEMA_VERSION {
            warn!(stored, supported = SCHEMA_VERSION, "Refusing to open newer schema");
            return Err(DbError::invalid_state(format!(
                "database schema version {} is newer than supported version {}",
                stored, SCHEMA_VERSION
            )));
        }

        self.create_plant_table().await?;

        if stored != SCHEMA_VERSION {
            self.on_upgrade(stored, SCHEMA_VERSION);
            sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
                .execute(&self.pool)
                .await?;
        }

        info!(version = SCHEMA_VERSION, "Database schema verified");
        Ok(())
    }

    /// Stored schema version (0 for a fresh database).
    pub async fn schema_version(&self) -> Result<i64> {
        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    async fn create_plant_table(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 0,
                image TEXT,
                supplier_name TEXT NOT NULL,
                supplier_phone TEXT,
                supplier_email TEXT NOT NULL
            )"#,
            TABLE_NAME
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Runs whenever the stored version differs from [`SCHEMA_VERSION`].
    ///
    /// `from` is 0 for a database that was never stamped, including a file
    /// created moments ago. Version 1 needs no migration steps.
    fn on_upgrade(&self, from: i64, to: i64) {
        if from == 0 {
            info!(to, "Stamping unversioned schema");
        } else {
            info!(from, to, "Upgrading schema");
        }
    }
}
