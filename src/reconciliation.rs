//! Reconciliation records produced by the matching loop.

use crate::amount::Amount;
use crate::transaction::Transaction;

/// One settlement of a cash purchase against a withdrawal, or one leftover.
///
/// A purchase may appear in several records. The `settled` amounts of all
/// records sharing a `cash_id` add up to the purchase's original amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    cash_id: u64,
    cash_name: String,
    parent_id: Option<u64>,
    settled: Amount,
}

impl Reconciliation {
    /// Records `settled` of `purchase` as explained by `withdrawal`.
    pub fn matched(purchase: &Transaction, withdrawal: &Transaction, settled: Amount) -> Self {
        Reconciliation {
            cash_id: purchase.id(),
            cash_name: purchase.name().to_string(),
            parent_id: Some(withdrawal.id()),
            settled,
        }
    }

    /// Records whatever is left of `purchase` as unexplained.
    pub fn leftover(purchase: &Transaction) -> Self {
        Reconciliation {
            cash_id: purchase.id(),
            cash_name: purchase.name().to_string(),
            parent_id: None,
            settled: purchase.amount(),
        }
    }

    pub fn cash_id(&self) -> u64 {
        self.cash_id
    }

    pub fn cash_name(&self) -> &str {
        &self.cash_name
    }

    /// Id of the funding withdrawal, `None` for a leftover.
    pub fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    pub fn settled(&self) -> Amount {
        self.settled
    }

    pub fn is_leftover(&self) -> bool {
        self.parent_id.is_none()
    }
}
