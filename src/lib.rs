//! # Moim Ledger
//!
//! Settles shared group expenses: every member owes an equal share of the
//! total, and the engine finds a short list of transfers that evens everyone
//! out.
//!
//! ## Design Principles
//!
//! - **Exact decimals**: money is `rust_decimal`, balances are rounded to cents
//! - **Pure core**: [`balance::compute`] and [`transfer::minimize`] do no I/O
//!   and cannot fail
//! - **Strict boundary**: uploads and statement text are validated before a
//!   [`Transaction`] exists
//! - **Deterministic output**: balances and transfers follow member order
//!
//! ## Example
//!
//! ```
//! use moim_ledger::{InMemorySessionStore, SessionStore, Transaction, Money};
//!
//! let store = InMemorySessionStore::default();
//! let id = store
//!     .create(vec!["Alice".into(), "Bob".into(), "Carol".into()])
//!     .unwrap();
//! let settlement = store
//!     .append_transactions(&id, vec![Transaction::new("Alice", Money::from(300)).unwrap()])
//!     .unwrap();
//!
//! assert_eq!(settlement.transfers.len(), 2);
//! assert_eq!(settlement.transfers[0].from, "Bob");
//! ```

pub mod balance;
pub mod error;
pub mod export;
pub mod ingest;
pub mod money;
pub mod report;
pub mod session;
pub mod settlement;
pub mod statement;
pub mod transaction;
pub mod transfer;

pub use balance::{BalanceRecord, BalanceSheet, BalanceStatus};
pub use error::{InvalidInput, LedgerError, Result};
pub use money::Money;
pub use session::{
    InMemorySessionStore, Session, SessionConfig, SessionId, SessionInputs, SessionStore,
    UnknownPayerPolicy,
};
pub use settlement::Settlement;
pub use statement::StatementScan;
pub use transaction::{Transaction, TransactionRecord};
pub use transfer::TransferRecord;
