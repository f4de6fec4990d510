//! Moim Ledger CLI
//!
//! Reads expense uploads and statement text for one group, then prints who
//! owes whom.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --members "Alice,Bob,Carol" expenses.csv > report.txt
//! cargo run -- -m "Alice,Bob" --statement alice.txt --payer Alice --format csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `MOIM_MEMBERS`: Fallback for `--members`
//! - `MOIM_FORMAT`: Fallback for `--format`

use clap::{Parser, ValueEnum};
use log::{info, warn};
use moim_ledger::{
    export, ingest, report, statement, InMemorySessionStore, LedgerError, Result,
    SessionConfig, SessionStore, UnknownPayerPolicy,
};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable settlement report
    Report,
    /// Summary, balances and transfers as CSV sections
    Csv,
    /// The full settlement as JSON
    Json,
}

#[derive(Parser)]
#[command(
    name = "moim-ledger",
    version,
    about = "Settle shared group expenses with the fewest transfers"
)]
struct Cli {
    /// Comma-separated member names, e.g. "Alice,Bob,Carol"
    #[arg(short, long, env = "MOIM_MEMBERS")]
    members: String,

    /// CSV uploads with `payer` and `amount` columns
    uploads: Vec<PathBuf>,

    /// Statement text extracted from a receipt; pair each with --payer
    #[arg(long = "statement", value_name = "FILE")]
    statements: Vec<PathBuf>,

    /// Member who paid the matching --statement
    #[arg(long = "payer", value_name = "NAME")]
    payers: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, env = "MOIM_FORMAT", default_value_t = OutputFormat::Report)]
    format: OutputFormat,

    /// Accept payers that are not members instead of rejecting the input
    #[arg(long)]
    allow_unknown_payers: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.statements.len() != cli.payers.len() {
        return Err(LedgerError::MismatchedStatementPayers {
            statements: cli.statements.len(),
            payers: cli.payers.len(),
        });
    }

    let members = ingest::parse_members(&cli.members)?;
    let store = InMemorySessionStore::new(SessionConfig {
        ttl: None,
        unknown_payers: if cli.allow_unknown_payers {
            UnknownPayerPolicy::Keep
        } else {
            UnknownPayerPolicy::Reject
        },
    });
    let id = store.create(members)?;

    for path in &cli.uploads {
        let file = File::open(path)?;
        let transactions = ingest::read_csv(BufReader::new(file))?;
        info!("{}: {} transaction(s)", path.display(), transactions.len());
        store.append_transactions(&id, transactions)?;
    }

    for (path, payer) in cli.statements.iter().zip(&cli.payers) {
        let text = fs::read_to_string(path)?;
        let scan = statement::parse_statement(&text, payer)?;
        info!(
            "{}: {} withdrawal(s), {} detected",
            path.display(),
            scan.transactions.len(),
            scan.total_detected
        );
        store.append_transactions(&id, scan.transactions)?;
    }

    let session = store.get(&id)?;
    if session.settlement.needs_participants() {
        warn!("Session {} has expenses but no members", id);
        eprintln!("Warning: expenses were recorded but no members were given");
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    match cli.format {
        OutputFormat::Report => report::write_report(&session, handle)?,
        OutputFormat::Csv => export::write_csv(&session.settlement, handle)?,
        OutputFormat::Json => export::write_json(&session.settlement, handle)?,
    }

    store.close(&id)
}
