//! Database migration runner for Gemledger.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use gemledger_db::{Migrator, SqliteStore};
use gemledger_shared::{AppConfig, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "migrator", version, about = "Gemledger database migrations")]
struct Cli {
    /// Database file; defaults to `database.path` from configuration.
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all pending migrations
    Up,
    /// Roll back the last applied migration
    Down,
    /// Show which migrations are applied
    Status,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging).map_err(|e| anyhow!(e))?;

    let path = cli.database.unwrap_or(config.database.path);
    let mut store = SqliteStore::open(&path)?;
    let conn = store.connection_mut();

    match cli.command {
        Command::Up => {
            let applied = Migrator::up(conn)?;
            info!(count = applied.len(), "Migrations applied");
            for name in applied {
                println!("applied  {name}");
            }
        }
        Command::Down => match Migrator::down(conn)? {
            Some(name) => println!("reverted {name}"),
            None => println!("nothing to revert"),
        },
        Command::Status => {
            println!("version  {}", Migrator::version(conn)?);
            for status in Migrator::status(conn)? {
                let state = if status.applied { "applied" } else { "pending" };
                println!("{state:<8} {}", status.name);
            }
        }
    }
    Ok(())
}
