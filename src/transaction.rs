//! Transaction models for CSV parsing and internal representation.

use crate::error::InvalidInput;
use crate::money::Money;
use serde::Deserialize;
use std::str::FromStr;

/// Raw transaction record as read from an uploaded CSV.
///
/// Every field is optional at this stage; [`TransactionRecord::parse`] decides
/// whether the row is usable.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRecord {
    /// Member who paid
    pub payer: Option<String>,

    /// Amount paid, non-negative decimal
    pub amount: Option<String>,

    /// Free-form date, carried along untouched
    #[serde(default)]
    pub date: Option<String>,

    /// Free-form merchant, carried along untouched
    #[serde(default)]
    pub merchant: Option<String>,
}

impl TransactionRecord {
    /// Validates the raw record into a [`Transaction`].
    pub fn parse(&self) -> Result<Transaction, InvalidInput> {
        let payer = self.payer.as_deref().unwrap_or_default();
        let amount = self.parse_amount()?;

        Ok(Transaction::new(payer, amount)?
            .with_provenance(non_blank(&self.date), non_blank(&self.merchant)))
    }

    fn parse_amount(&self) -> Result<Money, InvalidInput> {
        let raw = self.amount.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(InvalidInput::MissingAmount);
        }
        Money::from_str(raw).map_err(|_| InvalidInput::MalformedAmount(raw.to_string()))
    }
}

fn non_blank(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// One recorded expense.
///
/// Can only be built through [`Transaction::new`], which rejects blank payers
/// and amounts outside `0..=Money::MAX_AMOUNT`. Date and merchant are opaque
/// passengers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    payer: String,
    amount: Money,
    date: Option<String>,
    merchant: Option<String>,
}

impl Transaction {
    /// Creates a validated transaction. The payer is trimmed.
    pub fn new(payer: impl AsRef<str>, amount: Money) -> Result<Self, InvalidInput> {
        let payer = payer.as_ref().trim();
        if payer.is_empty() {
            return Err(InvalidInput::EmptyPayer);
        }
        if amount.is_negative() {
            return Err(InvalidInput::NegativeAmount(amount.as_decimal().to_string()));
        }
        if amount > Money::MAX_AMOUNT {
            return Err(InvalidInput::AmountTooLarge(amount.as_decimal().to_string()));
        }

        Ok(Transaction {
            payer: payer.to_string(),
            amount,
            date: None,
            merchant: None,
        })
    }

    /// Attaches provenance fields.
    pub fn with_provenance(mut self, date: Option<String>, merchant: Option<String>) -> Self {
        self.date = date;
        self.merchant = merchant;
        self
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref()
    }
}
