//! Reconciliation engine for a single batch.
//!
//! Loads every transaction of one CSV source, then runs the matching loop
//! over the whole batch at once. Unlike the loop itself, loading is strict:
//! the first malformed row fails the batch.

use crate::error::{ReconcileError, Result};
use crate::output::{self, OutputFormat};
use crate::reconciler::{self, MatchPolicy};
use crate::reconciliation::Reconciliation;
use crate::stacks::StackPair;
use crate::transaction::{Transaction, TransactionRow, ROW_FIELDS};
use csv::{ReaderBuilder, Trim};
use log::debug;
use std::collections::HashSet;
use std::io::{Read, Write};

/// One batch of transactions and, once reconciled, its records.
pub struct ReconcileEngine {
    policy: MatchPolicy,

    /// Transactions loaded so far, in input order.
    transactions: Vec<Transaction>,

    /// Ids already seen, for duplicate detection.
    ids: HashSet<u64>,

    /// Output of the last `reconcile` call.
    records: Vec<Reconciliation>,
}

impl ReconcileEngine {
    /// Creates an empty engine using the default matching policy.
    pub fn new() -> Self {
        Self::with_policy(MatchPolicy::default())
    }

    /// Creates an empty engine using `policy` for blocked withdrawals.
    pub fn with_policy(policy: MatchPolicy) -> Self {
        ReconcileEngine {
            policy,
            transactions: Vec::new(),
            ids: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Reads transactions from a CSV source whose first line is a header.
    ///
    /// Nothing is added to the batch unless every row loads.
    ///
    /// # Errors
    ///
    /// Fails on the first row with the wrong field count, an unparseable
    /// field, an ambiguous kind or an id already loaded.
    pub fn load_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut loaded = Vec::new();
        let mut ids = HashSet::new();

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row
            let record = result?;

            if record.len() != ROW_FIELDS {
                return Err(ReconcileError::MalformedInput {
                    row,
                    message: format!("expected {} fields, found {}", ROW_FIELDS, record.len()),
                });
            }

            let raw: TransactionRow =
                record
                    .deserialize(None)
                    .map_err(|e| ReconcileError::MalformedInput {
                        row,
                        message: e.to_string(),
                    })?;
            let tx = raw.parse(row)?;

            if self.ids.contains(&tx.id()) || !ids.insert(tx.id()) {
                return Err(ReconcileError::DuplicateId { id: tx.id(), row });
            }
            log_zero_amount(&tx, row);
            loaded.push(tx);
        }

        self.ids.extend(ids);
        self.transactions.extend(loaded);
        Ok(())
    }

    /// Adds one already-parsed transaction to the batch.
    pub fn add_transaction(&mut self, tx: Transaction, row: usize) -> Result<()> {
        if !self.ids.insert(tx.id()) {
            return Err(ReconcileError::DuplicateId { id: tx.id(), row });
        }
        log_zero_amount(&tx, row);
        self.transactions.push(tx);
        Ok(())
    }

    /// Transactions loaded and not yet reconciled.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Reconciles every loaded transaction and keeps the records.
    ///
    /// The loaded transactions are consumed; a following `load_csv` starts a
    /// fresh batch.
    pub fn reconcile(&mut self) -> Result<&[Reconciliation]> {
        let transactions = std::mem::take(&mut self.transactions);
        self.ids.clear();

        let stacks = StackPair::from_transactions(transactions);
        debug!(
            "Reconciling {} purchases against {} withdrawals",
            stacks.purchases().len(),
            stacks.withdrawals().len()
        );

        self.records = reconciler::reconcile(stacks, self.policy)?;
        Ok(self.records.as_slice())
    }

    /// Records produced by the last `reconcile` call.
    pub fn records(&self) -> &[Reconciliation] {
        &self.records
    }

    /// Writes the records of the last `reconcile` call.
    pub fn write_output<W: Write>(&self, writer: W, format: OutputFormat) -> Result<()> {
        output::write_reconciliations(&self.records, writer, format)
    }
}

fn log_zero_amount(tx: &Transaction, row: usize) {
    if tx.is_exhausted() {
        debug!("Row {}: Transaction {} has a zero amount", row, tx.id());
    }
}

impl Default for ReconcileEngine {
    fn default() -> Self {
        Self::new()
    }
}
