//! Transactions from bank-statement text.
//!
//! Reads the text an external OCR tool extracted from a statement screenshot.
//! A line is a withdrawal when it carries a `MM.DD` date, a merchant and a
//! negative amount written with thousands separators:
//!
//! ```text
//! 02.14  Blue Bottle Cafe   -12,500   87,500
//! ```

use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::transaction::Transaction;
use log::{debug, info};

/// Transactions found in one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementScan {
    pub transactions: Vec<Transaction>,
    pub total_detected: Money,
}

/// Scans statement text and books every withdrawal line to `payer`.
///
/// Lines that do not look like a withdrawal are skipped.
pub fn parse_statement(text: &str, payer: &str) -> Result<StatementScan> {
    let mut transactions = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let Some(entry) = scan_line(line) else {
            continue;
        };
        debug!(
            "Line {}: {} {} -{}",
            line_no + 1,
            entry.date,
            entry.merchant,
            entry.amount
        );

        let tx = Transaction::new(payer, Money::from(entry.amount))
            .map_err(|source| LedgerError::InvalidRecord {
                row: line_no + 1,
                source,
            })?
            .with_provenance(Some(entry.date.to_string()), Some(entry.merchant));
        transactions.push(tx);
    }

    let total_detected = transactions.iter().map(Transaction::amount).sum();
    info!(
        "Detected {} withdrawal(s) totalling {} for {}",
        transactions.len(),
        total_detected,
        payer
    );

    Ok(StatementScan {
        transactions,
        total_detected,
    })
}

struct LineEntry<'a> {
    date: &'a str,
    merchant: String,
    amount: i64,
}

fn scan_line(line: &str) -> Option<LineEntry<'_>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    tokens.iter().copied().enumerate().find_map(|(date_idx, token)| {
        let date = date_suffix(token)?;
        // merchant needs at least one token between the date and the amount
        let (amount_idx, amount) = tokens
            .iter()
            .copied()
            .enumerate()
            .skip(date_idx + 2)
            .find_map(|(idx, t)| grouped_amount(t).map(|amount| (idx, amount)))?;

        Some(LineEntry {
            date,
            merchant: tokens[date_idx + 1..amount_idx].concat(),
            amount,
        })
    })
}

/// The `MM.DD` a token ends with, as in `02.14` or `2024.02.14`.
fn date_suffix(token: &str) -> Option<&str> {
    let start = token.len().checked_sub(5)?;
    let tail = &token.as_bytes()[start..];
    let is_date = tail[2] == b'.'
        && tail[..2].iter().all(u8::is_ascii_digit)
        && tail[3..].iter().all(u8::is_ascii_digit);

    is_date.then(|| &token[start..])
}

/// Reads the `-1,234` prefix of a token. At least one `,ddd` group is
/// required; whatever follows the last full group (`원`, `.56`) is ignored.
fn grouped_amount(token: &str) -> Option<i64> {
    let bytes = token.strip_prefix('-')?.as_bytes();

    let head = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if head == 0 || head > 3 {
        return None;
    }

    let mut value = digits(&bytes[..head]);
    let mut pos = head;
    while let Some(group) = bytes.get(pos..pos + 4) {
        if group[0] != b',' || !group[1..].iter().all(u8::is_ascii_digit) {
            break;
        }
        value = value.checked_mul(1000)?.checked_add(digits(&group[1..]))?;
        pos += 4;
    }

    (pos > head).then_some(value)
}

fn digits(bytes: &[u8]) -> i64 {
    bytes.iter().fold(0, |acc, b| acc * 10 + i64::from(b - b'0'))
}
