//! One settlement run: balance calculation followed by transfer minimization.
//!
//! The result is a plain value that is replaced wholesale whenever the
//! members or transactions change; there is no partial-update path.

use crate::balance::{self, BalanceRecord, BalanceSheet};
use crate::money::Money;
use crate::transaction::Transaction;
use crate::transfer::{self, TransferRecord};
use log::{debug, warn};
use serde::Serialize;

/// Combined result of a settlement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Sum of every transaction amount.
    pub total_amount: Money,

    /// `total_amount / members`, unrounded. Zero without members.
    pub per_person_share: Money,

    /// One record per declared member, in member order.
    pub balances: Vec<BalanceRecord>,

    /// Transfers that zero all balances.
    pub transfers: Vec<TransferRecord>,
}

impl Settlement {
    /// Runs the balance calculator and then the transfer minimizer.
    pub fn compute(transactions: &[Transaction], members: &[String]) -> Self {
        let BalanceSheet {
            total_amount,
            per_person_share,
            balances,
        } = balance::compute(transactions, members);
        let transfers = transfer::minimize(&balances);

        debug!(
            "Settled {} transaction(s) across {} member(s): total {}, {} transfer(s)",
            transactions.len(),
            members.len(),
            total_amount,
            transfers.len()
        );

        let settlement = Settlement {
            total_amount,
            per_person_share,
            balances,
            transfers,
        };
        if settlement.needs_participants() {
            warn!("Total {} recorded but no members to split it", total_amount);
        }
        settlement
    }

    /// True when money was recorded but there is nobody to split it between.
    ///
    /// Callers should ask for participants before presenting the result.
    pub fn needs_participants(&self) -> bool {
        self.balances.is_empty() && !self.total_amount.is_zero()
    }

    /// Number of members whose balance is exactly zero.
    pub fn settled_count(&self) -> usize {
        self.balances.iter().filter(|b| b.balance.is_zero()).count()
    }
}
