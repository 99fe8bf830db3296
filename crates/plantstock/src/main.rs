//! PlantStock command-line inventory tracker
//!
//! Lists, searches, edits and restocks plant records kept in a local SQLite
//! file (default `~/.plantstock/plants.db`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use plantstock_db::{AddressMatcher, DbError, PlantDb, PlantStore};
use plantstock_logging::LogConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

mod cli;

use cli::error::HelpfulError;
use cli::plant::PlantCommand;

#[derive(Parser, Debug)]
#[command(name = "plantstock", version, about = "Plant inventory tracker")]
struct Cli {
    /// Database file to use instead of ~/.plantstock/plants.db
    #[arg(long, global = true, env = "PLANTSTOCK_DB", value_name = "PATH")]
    db: Option<PathBuf>,

    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Plant(PlantCommand),

    /// Show resolved paths
    Config(cli::config::ConfigArgs),
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config(args) => cli::config::run(args, cli.db.as_deref()),
        Commands::Plant(command) => {
            let db_path = cli::config::db_path(cli.db.as_deref());

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;

            rt.block_on(async {
                let store = open_store(&db_path).await?;
                let result = cli::plant::run(&store, command).await;
                store.db().clone().close().await;
                result
            })
        }
    }
}

async fn open_store(db_path: &Path) -> Result<PlantStore> {
    debug!(path = %db_path.display(), "Opening plant database");
    let db = PlantDb::open_path(db_path).await.map_err(|e| {
        if matches!(e, DbError::InvalidState(_)) {
            HelpfulError::from_db(&e)
        } else {
            HelpfulError::cannot_open_db(db_path, &e.to_string())
        }
    })?;
    Ok(PlantStore::new(db, AddressMatcher::default()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match plantstock_logging::init_logging(LogConfig {
        app_name: "plantstock",
        verbose: cli.verbose,
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_comma_price() {
        let cli = Cli::try_parse_from([
            "plantstock",
            "add",
            "--name",
            "Fern",
            "--price",
            "4,50",
            "--quantity",
            "3",
            "--supplier-name",
            "Greenhouse",
            "--supplier-email",
            "g@example.com",
        ])
        .unwrap();
        match cli.command {
            Commands::Plant(PlantCommand::Add(args)) => {
                assert_eq!(args.price, 4.5);
                assert_eq!(args.quantity, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_price_and_quantity() {
        let edit = |extra: [&'static str; 2]| {
            Cli::try_parse_from(["plantstock", "edit", "1"].into_iter().chain(extra))
        };
        assert!(edit(["--price", "4.50€"]).is_err());
        assert!(edit(["--quantity", "10000"]).is_err());
        assert!(edit(["--quantity", "-1"]).is_err());
        assert!(edit(["--quantity", "9999"]).is_ok());
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["plantstock", "list", "--db", "/tmp/p.db", "-v"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn test_open_store_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("plants.db");
        let store = open_store(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.db().count(None).await.unwrap(), 0);
    }
}
