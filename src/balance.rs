//! Balance calculation from transaction records.
//!
//! Maintains the invariant: the balances of all declared members sum to zero
//! within half a cent per member whenever at least one member exists.

use crate::money::Money;
use crate::transaction::Transaction;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Where a participant stands after the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// Paid more than their share and is owed money.
    Receive,
    /// Paid less than their share and owes money.
    Send,
    /// Paid exactly their share.
    Settled,
}

/// One participant's net position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRecord {
    /// Member identifier.
    pub name: String,

    /// Sum of everything this member paid.
    pub paid: Money,

    /// `paid - per_person_share`, rounded to cents. Positive means owed.
    pub balance: Money,
}

impl BalanceRecord {
    pub fn new(name: impl Into<String>, paid: Money, balance: Money) -> Self {
        BalanceRecord {
            name: name.into(),
            paid,
            balance,
        }
    }

    pub fn status(&self) -> BalanceStatus {
        match self.balance.signum() {
            Ordering::Greater => BalanceStatus::Receive,
            Ordering::Less => BalanceStatus::Send,
            Ordering::Equal => BalanceStatus::Settled,
        }
    }
}

/// Output of [`compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    pub total_amount: Money,
    pub per_person_share: Money,
    pub balances: Vec<BalanceRecord>,
}

/// Reduces transactions and members into per-member balances.
///
/// An empty member list yields a zero share and no balance records. Payments
/// by a payer who is not in `members` count toward `total_amount` but get no
/// balance record.
pub fn compute(transactions: &[Transaction], members: &[String]) -> BalanceSheet {
    let total_amount: Money = transactions.iter().map(Transaction::amount).sum();
    let per_person_share = total_amount.split_evenly(members.len());

    let mut paid_by: HashMap<&str, Money> = HashMap::new();
    for tx in transactions {
        *paid_by.entry(tx.payer()).or_default() += tx.amount();
    }

    let balances = members
        .iter()
        .map(|member| {
            let paid = paid_by.get(member.as_str()).copied().unwrap_or_default();
            BalanceRecord::new(member.clone(), paid, (paid - per_person_share).round_cents())
        })
        .collect();

    BalanceSheet {
        total_amount,
        per_person_share,
        balances,
    }
}
