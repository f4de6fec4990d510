//! Plain-text settlement report.

use crate::balance::BalanceStatus;
use crate::error::Result;
use crate::money::Money;
use crate::session::Session;
use std::io::Write;

/// Formats an amount for people: thousands separators, no decimals for whole
/// amounts, two decimals otherwise.
///
/// ```
/// use moim_ledger::{report::format_amount, Money};
///
/// assert_eq!(format_amount(Money::from(1_234_000)), "1,234,000");
/// assert_eq!(format_amount("-1234.5".parse().unwrap()), "-1,234.50");
/// ```
pub fn format_amount(amount: Money) -> String {
    let rounded = amount.round_cents();
    let magnitude = rounded.abs();

    let plain = if magnitude.is_whole() {
        magnitude.as_decimal().trunc().to_string()
    } else {
        magnitude.to_string()
    };
    let (whole, fraction) = match plain.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Like [`format_amount`] but always shows a sign on non-zero amounts.
pub fn format_signed(amount: Money) -> String {
    let formatted = format_amount(amount);
    if amount.round_cents().is_positive() {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn status_label(status: BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::Receive => "to receive",
        BalanceStatus::Send => "to send",
        BalanceStatus::Settled => "settled",
    }
}

/// Writes the human-readable report for a session.
pub fn write_report<W: Write>(session: &Session, mut writer: W) -> Result<()> {
    let settlement = &session.settlement;
    let members = &session.inputs.members;

    writeln!(writer, "Moim Ledger settlement report")?;
    writeln!(
        writer,
        "Document {}  |  Participants {}",
        session.id.document_number(),
        members.len()
    )?;
    writeln!(writer)?;

    writeln!(writer, "1. Summary")?;
    writeln!(writer, "  {:<24}{:>16}", "Total spent", format_amount(settlement.total_amount))?;
    writeln!(
        writer,
        "  {:<24}{:>16}",
        "Per person",
        format_amount(settlement.per_person_share)
    )?;
    writeln!(
        writer,
        "  {:<24}{:>16}",
        "Settled participants",
        format!("{} / {}", settlement.settled_count(), settlement.balances.len())
    )?;
    writeln!(
        writer,
        "  {:<24}{:>16}",
        "Recommended transfers",
        settlement.transfers.len()
    )?;
    if settlement.needs_participants() {
        writeln!(writer, "  No participants yet: add members before settling.")?;
    }
    writeln!(writer)?;

    let name_width = members
        .iter()
        .map(|m| m.chars().count())
        .chain(std::iter::once(4))
        .max()
        .unwrap_or(4);

    writeln!(writer, "2. Balances")?;
    writeln!(
        writer,
        "  {:>3}  {:<nw$}  {:>14}  {:>14}  {}",
        "No",
        "Name",
        "Paid",
        "Balance",
        "Status",
        nw = name_width
    )?;
    for (idx, record) in settlement.balances.iter().enumerate() {
        writeln!(
            writer,
            "  {:>3}  {:<nw$}  {:>14}  {:>14}  {}",
            idx + 1,
            record.name,
            format_amount(record.paid),
            format_signed(record.balance),
            status_label(record.status()),
            nw = name_width
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "3. Recommended transfers")?;
    if settlement.transfers.is_empty() {
        writeln!(writer, "  No further transfers needed.")?;
    } else {
        writeln!(
            writer,
            "  {:<nw$}  {:<nw$}  {:>14}",
            "From",
            "To",
            "Amount",
            nw = name_width
        )?;
        for transfer in &settlement.transfers {
            writeln!(
                writer,
                "  {:<nw$}  {:<nw$}  {:>14}",
                transfer.from,
                transfer.to,
                format_amount(transfer.amount),
                nw = name_width
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InMemorySessionStore, SessionStore};
    use crate::transaction::Transaction;
    use std::str::FromStr;

    fn dec(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("0")), "0");
        assert_eq!(format_amount(dec("999")), "999");
        assert_eq!(format_amount(dec("1000")), "1,000");
        assert_eq!(format_amount(dec("1234567.00")), "1,234,567");
        assert_eq!(format_amount(dec("33.3333")), "33.33");
        assert_eq!(format_amount(dec("12345.5")), "12,345.50");
        assert_eq!(format_amount(dec("-100")), "-100");
        assert_eq!(format_amount(dec("-0.001")), "0");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(dec("200")), "+200");
        assert_eq!(format_signed(dec("-33.33")), "-33.33");
        assert_eq!(format_signed(Money::ZERO), "0");
    }

    #[test]
    fn test_report_lists_balances_and_transfers() {
        let store = InMemorySessionStore::default();
        let members = vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()];
        let id = store.create(members).unwrap();
        store
            .append_transactions(&id, vec![Transaction::new("Alice", dec("300")).unwrap()])
            .unwrap();
        let session = store.get(&id).unwrap();

        let mut output = Vec::new();
        write_report(&session, &mut output).unwrap();
        let report = String::from_utf8(output).unwrap();

        assert!(report.contains(&id.document_number()));
        assert!(report.contains("Participants 3"));
        assert!(report.contains("Recommended transfers"));
        let alice = report.lines().find(|l| l.contains("Alice") && l.contains("+200")).unwrap();
        assert!(alice.ends_with("to receive"));
        assert!(report.lines().any(|l| l.contains("Bob") && l.ends_with("to send")));
        assert!(report.lines().any(|l| {
            let cols: Vec<&str> = l.split_whitespace().collect();
            cols == ["Carol", "Alice", "100"]
        }));
    }

    #[test]
    fn test_report_without_transfers() {
        let store = InMemorySessionStore::default();
        let id = store.create(vec!["Alice".to_string()]).unwrap();
        let session = store.get(&id).unwrap();

        let mut output = Vec::new();
        write_report(&session, &mut output).unwrap();
        let report = String::from_utf8(output).unwrap();

        assert!(report.contains("No further transfers needed."));
        assert!(report.contains("settled"));
    }
}
