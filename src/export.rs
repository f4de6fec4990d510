//! Structured exports of a settlement.
//!
//! Exports read the cached [`Settlement`] as plain data; no settlement logic
//! runs here.

use crate::error::Result;
use crate::settlement::Settlement;
use csv::WriterBuilder;
use std::io::Write;

/// Writes the settlement as three CSV sections separated by a blank line:
/// the summary (`total_amount`, `per_person`), the per-member `settlement`
/// table and the `transfers` table.
///
/// All monetary values are formatted with exactly 2 decimal places.
pub fn write_csv<W: Write>(settlement: &Settlement, mut writer: W) -> Result<()> {
    {
        let mut summary = WriterBuilder::new().from_writer(&mut writer);
        summary.write_record(["total_amount", settlement.total_amount.to_string().as_str()])?;
        summary.write_record(["per_person", settlement.per_person_share.to_string().as_str()])?;
        summary.flush()?;
    }
    writer.write_all(b"\n")?;

    {
        let mut balances = WriterBuilder::new().from_writer(&mut writer);
        balances.write_record(["name", "paid", "balance"])?;
        for record in &settlement.balances {
            balances.write_record([
                record.name.clone(),
                record.paid.to_string(),
                record.balance.to_string(),
            ])?;
        }
        balances.flush()?;
    }
    writer.write_all(b"\n")?;

    let mut transfers = WriterBuilder::new().from_writer(&mut writer);
    transfers.write_record(["from", "to", "amount"])?;
    for transfer in &settlement.transfers {
        transfers.write_record([
            transfer.from.as_str(),
            transfer.to.as_str(),
            transfer.amount.to_string().as_str(),
        ])?;
    }
    transfers.flush()?;

    Ok(())
}

/// Writes the settlement as pretty-printed JSON.
pub fn write_json<W: Write>(settlement: &Settlement, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, settlement)?;
    writer.write_all(b"\n")?;
    Ok(())
}
