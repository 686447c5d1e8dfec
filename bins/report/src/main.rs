//! Balance reports over a Gemledger book.
//!
//! Prints JSON to stdout; logs go to stderr.
//!
//! Usage:
//!   gemledger-report <book> [--start YYYY-MM-DD] [--end YYYY-MM-DD]
//!   gemledger-report <book> --by-currency
//!   gemledger-report <book> --summary [--latest N]

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;
use gemledger_core::book::BookSummary;
use gemledger_core::ledger::{Entry, EntryStore};
use gemledger_core::reports::BalanceReport;
use gemledger_db::BookRepository;
use gemledger_shared::{AppConfig, logging};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "gemledger-report", version, about = "Balance reports over a book")]
struct Cli {
    /// Book slug
    book: String,

    /// First day of the report; defaults to the earliest entry
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the report; defaults to the latest entry
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Report each currency separately
    #[arg(long, conflicts_with = "summary")]
    by_currency: bool,

    /// Print tag, year, country and recorder counts instead of balances
    #[arg(long)]
    summary: bool,

    /// With --summary, also list the N most recent entries
    #[arg(long, default_value_t = 10, requires = "summary")]
    latest: usize,

    /// Database file; defaults to `database.path` from configuration
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<String>,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    book: &'a str,
    summary: BookSummary,
    latest: Vec<&'a Entry>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging).map_err(|e| anyhow!(e))?;

    let path = cli.database.as_deref().unwrap_or(&config.database.path);
    let store = gemledger_db::connect(path)?;

    let Some(book) = BookRepository::new(store.connection()).find_by_slug(&cli.book)? else {
        bail!("Book '{}' not found", cli.book);
    };
    let entries = store.book_entries(book.id)?;
    info!(book = %book.slug, entries = entries.len(), "Loaded book");

    let output = if cli.summary {
        serde_json::to_string_pretty(&SummaryOutput {
            book: &book.slug,
            summary: BookSummary::from_entries(&entries),
            latest: BookSummary::latest(&entries, cli.latest),
        })?
    } else if cli.by_currency {
        let reports = BalanceReport::report_by_currency(&entries, cli.start, cli.end)?;
        serde_json::to_string_pretty(&reports)?
    } else {
        // `null` for a book without entries, as opposed to a zero balance.
        let report = BalanceReport::report(&entries, cli.start, cli.end)?;
        serde_json::to_string_pretty(&report)?
    };

    println!("{output}");
    Ok(())
}
