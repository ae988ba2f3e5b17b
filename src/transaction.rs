//! Transaction models for CSV parsing and internal representation.

use crate::amount::Amount;
use crate::error::{ReconcileError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

/// Date format used by the input files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw transaction row as read from CSV.
///
/// Columns are positional: `id,name,amount,date,is_cash,is_atm`.
#[derive(Debug, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub is_cash: String,
    pub is_atm: String,
}

/// Number of columns a row must carry.
pub const ROW_FIELDS: usize = 6;

impl TransactionRow {
    /// Parses the raw row into a typed transaction.
    ///
    /// `row` is the 1-based line number used in error messages.
    pub fn parse(&self, row: usize) -> Result<Transaction> {
        let malformed = |message: String| ReconcileError::MalformedInput { row, message };

        let id = self
            .id
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(format!("invalid id '{}': {}", self.id, e)))?;

        // Legacy files strip every whitespace character from names
        let name: String = self.name.chars().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() {
            return Err(malformed("empty name".to_string()));
        }
        // Legacy output joins fields with ", " and cannot quote
        if name.contains(',') {
            return Err(malformed(format!("name '{}' contains a comma", name)));
        }

        let amount = Amount::from_str(&self.amount)
            .map_err(|e| malformed(format!("invalid amount '{}': {}", self.amount, e)))?;
        if amount.is_negative() {
            return Err(malformed(format!("negative amount {}", amount)));
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|e| malformed(format!("invalid date '{}': {}", self.date, e)))?;

        let is_cash = parse_flag(&self.is_cash).ok_or_else(|| {
            malformed(format!("invalid is_cash flag '{}'", self.is_cash))
        })?;
        let is_atm = parse_flag(&self.is_atm)
            .ok_or_else(|| malformed(format!("invalid is_atm flag '{}'", self.is_atm)))?;

        let kind = match (is_cash, is_atm) {
            (true, false) => TxKind::Purchase,
            (false, true) => TxKind::Withdrawal,
            _ => {
                return Err(ReconcileError::AmbiguousKind {
                    row,
                    is_cash,
                    is_atm,
                })
            }
        };

        Ok(Transaction::new(id, name, date, kind, amount))
    }
}

/// Parses a `true`/`false` flag, ignoring case and surrounding whitespace.
fn parse_flag(raw: &str) -> Option<bool> {
    let flag = raw.trim();
    if flag.eq_ignore_ascii_case("true") {
        Some(true)
    } else if flag.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Which stack a transaction is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// Cash taken out of an ATM; funds purchases made after it.
    Withdrawal,

    /// Purchase paid in cash; explained by earlier withdrawals.
    Purchase,
}

/// Sort key giving the chronological total order over transactions.
///
/// Ordered by date, then by id. Ids are unique within a batch, so two keys
/// are only equal when they come from the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChronoKey {
    pub date: NaiveDate,
    pub id: u64,
}

/// A cash purchase or ATM withdrawal taking part in reconciliation.
///
/// Everything but `amount` is fixed at construction. `amount` is the part
/// not yet reconciled and only ever decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: u64,
    name: String,
    date: NaiveDate,
    kind: TxKind,
    amount: Amount,
}

impl Transaction {
    /// Creates a new transaction with its full amount still unreconciled.
    pub fn new(id: u64, name: impl Into<String>, date: NaiveDate, kind: TxKind, amount: Amount) -> Self {
        Transaction {
            id,
            name: name.into(),
            date,
            kind,
            amount,
        }
    }

    /// Shorthand for a cash purchase.
    pub fn purchase(id: u64, name: impl Into<String>, date: NaiveDate, amount: Amount) -> Self {
        Self::new(id, name, date, TxKind::Purchase, amount)
    }

    /// Shorthand for an ATM withdrawal.
    pub fn withdrawal(id: u64, name: impl Into<String>, date: NaiveDate, amount: Amount) -> Self {
        Self::new(id, name, date, TxKind::Withdrawal, amount)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    /// Remaining unreconciled amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns `true` once nothing is left to reconcile.
    pub fn is_exhausted(&self) -> bool {
        !self.amount.is_positive()
    }

    /// Position of this transaction in the chronological order.
    pub fn key(&self) -> ChronoKey {
        ChronoKey {
            date: self.date,
            id: self.id,
        }
    }

    /// Returns `true` if `self` comes strictly after `other` chronologically.
    pub fn is_more_recent_than(&self, other: &Transaction) -> bool {
        self.key() > other.key()
    }

    /// Deducts `amount` from the remaining amount.
    ///
    /// Returns `false` without changing anything if that would go below zero.
    pub(crate) fn consume(&mut self, amount: Amount) -> bool {
        if amount > self.amount || amount.is_negative() {
            return false;
        }
        self.amount -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, amount: &str, date: &str, cash: &str, atm: &str) -> TransactionRow {
        TransactionRow {
            id: id.to_string(),
            name: name.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
            is_cash: cash.to_string(),
            is_atm: atm.to_string(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_purchase() {
        let tx = row("2", "Grocer", "40.25", "2020-01-02", "true", "false")
            .parse(2)
            .unwrap();

        assert_eq!(tx.id(), 2);
        assert_eq!(tx.name(), "Grocer");
        assert_eq!(tx.kind(), TxKind::Purchase);
        assert_eq!(tx.amount().to_string(), "40.25");
        assert_eq!(tx.date(), day("2020-01-02"));
    }

    #[test]
    fn test_parse_withdrawal() {
        let tx = row("1", "ATM", "100", "2020-01-01", "false", "TRUE")
            .parse(2)
            .unwrap();
        assert_eq!(tx.kind(), TxKind::Withdrawal);
    }

    #[test]
    fn test_parse_strips_whitespace_from_name() {
        let tx = row(" 7 ", " Corner  Store ", " 5 ", " 2020-03-04 ", " True ", " false ")
            .parse(2)
            .unwrap();
        assert_eq!(tx.id(), 7);
        assert_eq!(tx.name(), "CornerStore");
    }

    #[test]
    fn test_parse_rejects_comma_in_name() {
        let err = row("2", "Bob,Shop", "40", "2020-01-02", "true", "false")
            .parse(5)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedInput { row: 5, .. }));
    }

    #[test]
    fn test_parse_rejects_both_flags() {
        let err = row("1", "x", "1", "2020-01-01", "true", "true")
            .parse(3)
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::AmbiguousKind {
                row: 3,
                is_cash: true,
                is_atm: true
            }
        ));
    }

    #[test]
    fn test_parse_rejects_neither_flag() {
        let err = row("1", "x", "1", "2020-01-01", "false", "false")
            .parse(3)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::AmbiguousKind { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let cases = [
            row("abc", "x", "1", "2020-01-01", "true", "false"),
            row("-1", "x", "1", "2020-01-01", "true", "false"),
            row("1", "  ", "1", "2020-01-01", "true", "false"),
            row("1", "x", "ten", "2020-01-01", "true", "false"),
            row("1", "x", "-5", "2020-01-01", "true", "false"),
            row("1", "x", "1", "2020-13-01", "true", "false"),
            row("1", "x", "1", "2020-01-01", "yes", "false"),
        ];

        for case in cases {
            let err = case.parse(4).unwrap_err();
            assert!(
                matches!(err, ReconcileError::MalformedInput { row: 4, .. }),
                "expected malformed input for {:?}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_ordering_by_date_then_id() {
        let early = Transaction::purchase(9, "a", day("2020-01-01"), Amount::from(1));
        let late_low_id = Transaction::withdrawal(1, "b", day("2020-01-02"), Amount::from(1));
        let late_high_id = Transaction::purchase(2, "c", day("2020-01-02"), Amount::from(1));

        assert!(late_low_id.is_more_recent_than(&early));
        assert!(late_high_id.is_more_recent_than(&late_low_id));
        assert!(!early.is_more_recent_than(&late_high_id));
        assert!(!early.is_more_recent_than(&early));
        assert_eq!(early.key(), early.clone().key());
    }

    #[test]
    fn test_consume_never_goes_negative() {
        let mut tx = Transaction::purchase(1, "a", day("2020-01-01"), Amount::from(10));

        assert!(tx.consume(Amount::from(4)));
        assert_eq!(tx.amount(), Amount::from(6));
        assert!(!tx.consume(Amount::from(7)));
        assert_eq!(tx.amount(), Amount::from(6));
        assert!(tx.consume(Amount::from(6)));
        assert!(tx.is_exhausted());
    }
}
