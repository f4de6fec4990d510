//! Error types for the settlement ledger.
//!
//! The settlement core itself never fails; every variant here belongs to the
//! ingestion boundary, the session store or the I/O around them.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a single incoming transaction was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// Payer is missing or blank
    #[error("payer is empty")]
    EmptyPayer,

    /// Amount column is missing or blank
    #[error("amount is missing")]
    MissingAmount,

    /// Amount could not be parsed as a decimal number
    #[error("amount `{0}` is not a number")]
    MalformedAmount(String),

    /// Amount is below zero
    #[error("amount {0} is negative")]
    NegativeAmount(String),

    /// Amount exceeds [`Money::MAX_AMOUNT`](crate::Money::MAX_AMOUNT)
    #[error("amount {0} is too large")]
    AmountTooLarge(String),
}

/// Errors that can occur around a settlement run.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid transaction record in an upload
    #[error("Invalid transaction at row {row}: {source}")]
    InvalidRecord { row: usize, source: InvalidInput },

    /// Upload lacks a required header column
    #[error("Missing required column(s): {0}")]
    MissingColumns(String),

    /// Same participant listed twice
    #[error("Duplicate member: {0}")]
    DuplicateMember(String),

    /// Participant name is blank
    #[error("Member names must not be empty")]
    EmptyMember,

    /// Transaction payer is not a declared member
    #[error("Payer {0} is not a session member")]
    UnknownPayer(String),

    /// No session under the given id (or it expired)
    #[error("Session {0} not found")]
    SessionNotFound(String),

    /// A thread panicked while holding a session lock
    #[error("Session store lock poisoned")]
    StorePoisoned,

    /// `--statement` and `--payer` flags do not pair up
    #[error("Got {statements} statement file(s) but {payers} payer(s)")]
    MismatchedStatementPayers { statements: usize, payers: usize },
}
