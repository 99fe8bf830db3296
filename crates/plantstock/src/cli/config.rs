//! Configuration paths for PlantStock
//!
//! All paths live under ~/.plantstock/ unless overridden with
//! `PLANTSTOCK_HOME` or, for the database, `--db` / `PLANTSTOCK_DB`.

use std::path::{Path, PathBuf};

pub use plantstock_logging::{logs_dir, plantstock_home};

const DB_FILE_NAME: &str = "plants.db";

/// Get the default database path: ~/.plantstock/plants.db
pub fn default_db_path() -> PathBuf {
    plantstock_home().join(DB_FILE_NAME)
}

/// Resolve the active database path, preferring an explicit override.
pub fn db_path(override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(path) => path.to_path_buf(),
        None => default_db_path(),
    }
}

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved paths in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows current paths
pub fn run(args: ConfigArgs, db_override: Option<&Path>) -> anyhow::Result<()> {
    let home = plantstock_home();
    let db = db_path(db_override);
    let logs = logs_dir();

    if args.json {
        let config = serde_json::json!({
            "home": home.to_string_lossy(),
            "database": {
                "path": db.to_string_lossy(),
                "exists": db.exists(),
                "overridden": db_override.is_some(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("PLANTSTOCK CONFIGURATION");
        println!("========================");
        println!();
        println!("Home:     {}", home.display());
        println!(
            "Database: {} ({})",
            db.display(),
            if db.exists() { "exists" } else { "not created yet" }
        );
        println!(
            "Logs:     {} ({})",
            logs.display(),
            if logs.exists() { "exists" } else { "not found" }
        );
    }

    Ok(())
}
