//! Writing reconciliation records out as CSV.

use crate::amount::Amount;
use crate::error::Result;
use crate::reconciliation::Reconciliation;
use serde::Serialize;
use std::io::Write;

/// Marker written in place of a missing parent id.
pub const NULL_PARENT: &str = "null";

/// Output layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `id, name, parent, amount` with `", "` separators and whole-number
    /// amounts, byte-compatible with earlier releases of the tool.
    #[default]
    Legacy,

    /// Plain CSV with exact amounts.
    Exact,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    id: u64,
    name: &'a str,
    parent: String,
    amount: Amount,
}

impl<'a> From<&'a Reconciliation> for OutputRow<'a> {
    fn from(record: &'a Reconciliation) -> Self {
        OutputRow {
            id: record.cash_id(),
            name: record.cash_name(),
            parent: parent_field(record),
            amount: record.settled(),
        }
    }
}

fn parent_field(record: &Reconciliation) -> String {
    record
        .parent_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| NULL_PARENT.to_string())
}

/// Writes `records` in the given format, header first, in order.
pub fn write_reconciliations<W: Write>(
    records: &[Reconciliation],
    writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Legacy => write_legacy(records, writer),
        OutputFormat::Exact => write_exact(records, writer),
    }
}

fn write_legacy<W: Write>(records: &[Reconciliation], mut writer: W) -> Result<()> {
    writeln!(writer, "id, name, parent, amount")?;
    for record in records {
        writeln!(
            writer,
            "{}, {}, {}, {}",
            record.cash_id(),
            record.cash_name(),
            parent_field(record),
            record.settled().to_whole_string()
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_exact<W: Write>(records: &[Reconciliation], writer: W) -> Result<()> {
    // Header written by hand so an empty batch still gets one
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(["id", "name", "parent", "amount"])?;
    for record in records {
        csv_writer.serialize(OutputRow::from(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}
