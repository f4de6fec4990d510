//! Ingestion boundary for members and tabular uploads.
//!
//! Everything that reaches the settlement core passes through here first, so
//! the core can assume well-formed input.

use crate::error::{LedgerError, Result};
use crate::transaction::{Transaction, TransactionRecord};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::io::Read;

/// Header columns an upload must provide.
pub const REQUIRED_COLUMNS: [&str; 2] = ["payer", "amount"];

/// Parses a comma-separated member list.
///
/// Names are trimmed and blank entries dropped. Listing the same name twice
/// is an error.
pub fn parse_members(input: &str) -> Result<Vec<String>> {
    let members: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    ensure_unique(&members)?;
    Ok(members)
}

/// Checks that member names are non-blank and unique.
pub fn ensure_unique(members: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if member.trim().is_empty() {
            return Err(LedgerError::EmptyMember);
        }
        if !seen.insert(member.as_str()) {
            return Err(LedgerError::DuplicateMember(member.clone()));
        }
    }
    Ok(())
}

/// Reads every transaction from a CSV upload.
///
/// The upload is all-or-nothing: a missing `payer`/`amount` column or any
/// invalid row rejects the whole batch.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        warn!("Upload rejected, missing column(s) {:?}", missing);
        return Err(LedgerError::MissingColumns(missing.join(", ")));
    }

    let mut transactions = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
        let row = row_idx + 2; // 1-indexed, accounting for header row

        let record = result?;
        match record.parse() {
            Ok(tx) => {
                debug!("Row {}: {} paid {}", row, tx.payer(), tx.amount());
                transactions.push(tx);
            }
            Err(source) => {
                warn!("Row {}: {}", row, source);
                return Err(LedgerError::InvalidRecord { row, source });
            }
        }
    }

    info!("Read {} transaction(s) from upload", transactions.len());
    Ok(transactions)
}
