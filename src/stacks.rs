//! The pair of chronological stacks the reconciler consumes.

use crate::transaction::{Transaction, TxKind};

/// Purchases and withdrawals, each kept as a stack with the most recent
/// transaction on top.
///
/// Both stacks are `Vec`s whose last element is the top.
#[derive(Debug, Default, Clone)]
pub struct StackPair {
    purchases: Vec<Transaction>,
    withdrawals: Vec<Transaction>,
}

impl StackPair {
    /// Sorts `transactions` chronologically and pushes each one onto the
    /// stack for its kind, oldest first.
    pub fn from_transactions<I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut sorted: Vec<Transaction> = transactions.into_iter().collect();
        sorted.sort_by_key(Transaction::key);

        let mut pair = StackPair::default();
        for tx in sorted {
            match tx.kind() {
                TxKind::Purchase => pair.purchases.push(tx),
                TxKind::Withdrawal => pair.withdrawals.push(tx),
            }
        }
        pair
    }

    pub fn purchases(&self) -> &[Transaction] {
        &self.purchases
    }

    pub fn withdrawals(&self) -> &[Transaction] {
        &self.withdrawals
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty() && self.withdrawals.is_empty()
    }

    /// Mutable access to both tops at once.
    pub(crate) fn tops_mut(&mut self) -> Option<(&mut Transaction, &mut Transaction)> {
        match (self.purchases.last_mut(), self.withdrawals.last_mut()) {
            (Some(p), Some(w)) => Some((p, w)),
            _ => None,
        }
    }

    pub(crate) fn pop_purchase(&mut self) -> Option<Transaction> {
        self.purchases.pop()
    }

    pub(crate) fn pop_withdrawal(&mut self) -> Option<Transaction> {
        self.withdrawals.pop()
    }
}
