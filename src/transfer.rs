//! Greedy transfer minimization.
//!
//! Debtors and creditors are matched front to back in member order. Every
//! step zeroes at least one side, so `n` non-zero balances settle in at most
//! `n - 1` transfers.

use crate::balance::BalanceRecord;
use crate::money::Money;
use log::debug;
use serde::Serialize;

/// A single recommended payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

impl TransferRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Money) -> Self {
        TransferRecord {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// A member with an outstanding amount, always stored as a positive magnitude.
struct Open<'a> {
    name: &'a str,
    remaining: Money,
}

/// Produces the transfers that settle `balances`.
///
/// Zero balances are skipped. Ties are broken by input order: the earlier
/// debtor pays first and the earlier creditor is paid first.
pub fn minimize(balances: &[BalanceRecord]) -> Vec<TransferRecord> {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for record in balances {
        if record.balance.is_positive() {
            creditors.push(Open {
                name: &record.name,
                remaining: record.balance,
            });
        } else if record.balance.is_negative() {
            debtors.push(Open {
                name: &record.name,
                remaining: -record.balance,
            });
        }
    }

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = debtor.remaining.min(creditor.remaining);
        debug!("{} pays {} {}", debtor.name, creditor.name, amount);
        transfers.push(TransferRecord::new(
            debtor.name,
            creditor.name,
            amount.round_cents(),
        ));

        debtor.remaining -= amount;
        creditor.remaining -= amount;

        if debtor.remaining.is_zero() {
            i += 1;
        }
        if creditor.remaining.is_zero() {
            j += 1;
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn bal(name: &str, balance: &str) -> BalanceRecord {
        BalanceRecord::new(name, Money::ZERO, dec(balance))
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let transfers = minimize(&[bal("Alice", "200"), bal("Bob", "-100"), bal("Carol", "-100")]);

        assert_eq!(
            transfers,
            vec![
                TransferRecord::new("Bob", "Alice", dec("100")),
                TransferRecord::new("Carol", "Alice", dec("100")),
            ]
        );
    }

    #[test]
    fn test_all_settled_yields_nothing() {
        assert!(minimize(&[bal("A", "0"), bal("B", "0")]).is_empty());
        assert!(minimize(&[]).is_empty());
    }

    #[test]
    fn test_debtor_split_across_creditors() {
        let transfers = minimize(&[bal("A", "30"), bal("B", "20"), bal("C", "-50")]);

        assert_eq!(
            transfers,
            vec![
                TransferRecord::new("C", "A", dec("30")),
                TransferRecord::new("C", "B", dec("20")),
            ]
        );
    }

    #[test]
    fn test_order_follows_input_not_magnitude() {
        let transfers = minimize(&[
            bal("D1", "-10"),
            bal("C1", "5"),
            bal("D2", "-40"),
            bal("C2", "45"),
        ]);

        assert_eq!(
            transfers,
            vec![
                TransferRecord::new("D1", "C1", dec("5")),
                TransferRecord::new("D1", "C2", dec("5")),
                TransferRecord::new("D2", "C2", dec("40")),
            ]
        );
    }

    #[test]
    fn test_equal_amounts_advance_both_cursors() {
        let transfers = minimize(&[bal("A", "10"), bal("B", "-10"), bal("C", "7"), bal("D", "-7")]);

        assert_eq!(
            transfers,
            vec![
                TransferRecord::new("B", "A", dec("10")),
                TransferRecord::new("D", "C", dec("7")),
            ]
        );
    }

    #[test]
    fn test_rounding_residual_stops_cleanly() {
        let transfers = minimize(&[bal("A", "66.67"), bal("B", "-33.33"), bal("C", "-33.33")]);

        assert_eq!(
            transfers,
            vec![
                TransferRecord::new("B", "A", dec("33.33")),
                TransferRecord::new("C", "A", dec("33.33")),
            ]
        );
    }

    #[test]
    fn test_only_debtors_yields_nothing() {
        assert!(minimize(&[bal("A", "-5"), bal("B", "-5")]).is_empty());
    }
}
