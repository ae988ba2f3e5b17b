//! Greedy matching of cash purchases against ATM withdrawals.
//!
//! The most recent purchase is always matched first, against the most recent
//! withdrawal that precedes it. Each settlement exhausts at least one of the
//! two, so the loop always terminates.

use crate::amount::Amount;
use crate::error::{ReconcileError, Result};
use crate::reconciliation::Reconciliation;
use crate::stacks::StackPair;
use crate::transaction::{Transaction, TxKind};
use log::debug;
use std::cmp;

/// What to do when the top withdrawal is not older than the top purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Retire the blocking withdrawal unmatched and keep matching.
    #[default]
    DiscardBlocked,

    /// End the matching phase at the first blocking withdrawal. Remaining
    /// purchases are still drained as leftovers.
    StopAtFirstBlocked,
}

/// Settles `purchase` against `withdrawal` for as much as both can cover.
///
/// Both amounts are reduced by the settled amount, leaving at least one of
/// them at zero.
///
/// # Errors
///
/// Returns [`ReconcileError::InvariantViolation`] if either side is already
/// exhausted or the two are not a purchase and a withdrawal respectively.
pub fn settle(purchase: &mut Transaction, withdrawal: &mut Transaction) -> Result<Reconciliation> {
    if purchase.kind() != TxKind::Purchase || withdrawal.kind() != TxKind::Withdrawal {
        return Err(ReconcileError::InvariantViolation(format!(
            "cannot settle {:?} {} against {:?} {}",
            purchase.kind(),
            purchase.id(),
            withdrawal.kind(),
            withdrawal.id()
        )));
    }
    if !purchase.amount().is_positive() || !withdrawal.amount().is_positive() {
        return Err(ReconcileError::InvariantViolation(format!(
            "settling purchase {} ({}) against withdrawal {} ({}) with a non-positive amount",
            purchase.id(),
            purchase.amount(),
            withdrawal.id(),
            withdrawal.amount()
        )));
    }

    let matched: Amount = cmp::min(purchase.amount(), withdrawal.amount());
    let consumed = purchase.consume(matched) && withdrawal.consume(matched);
    debug_assert!(consumed, "matched amount never exceeds either side");

    Ok(Reconciliation::matched(purchase, withdrawal, matched))
}

/// Drains `stacks`, returning the reconciliation records in the order they
/// were produced: settlements first, then leftovers from the newest purchase
/// to the oldest.
pub fn reconcile(mut stacks: StackPair, policy: MatchPolicy) -> Result<Vec<Reconciliation>> {
    let mut records = Vec::new();

    while let Some((purchase, withdrawal)) = stacks.tops_mut() {
        if purchase.is_exhausted() {
            stacks.pop_purchase();
            continue;
        }
        if withdrawal.is_exhausted() {
            stacks.pop_withdrawal();
            continue;
        }

        if !purchase.is_more_recent_than(withdrawal) {
            debug!(
                "Withdrawal {} ({}) is not older than purchase {} ({}), retiring it unmatched",
                withdrawal.id(),
                withdrawal.date(),
                purchase.id(),
                purchase.date()
            );
            match policy {
                MatchPolicy::DiscardBlocked => {
                    stacks.pop_withdrawal();
                    continue;
                }
                MatchPolicy::StopAtFirstBlocked => break,
            }
        }

        let record = settle(purchase, withdrawal)?;
        let purchase_done = purchase.is_exhausted();
        let withdrawal_done = withdrawal.is_exhausted();
        debug!(
            "Settled {} of purchase {} against withdrawal {}",
            record.settled(),
            record.cash_id(),
            withdrawal.id()
        );

        if purchase_done {
            stacks.pop_purchase();
        }
        if withdrawal_done {
            stacks.pop_withdrawal();
        }
        records.push(record);
    }

    while let Some(purchase) = stacks.pop_purchase() {
        if purchase.is_exhausted() {
            continue;
        }
        debug!(
            "Purchase {} has {} left without a withdrawal",
            purchase.id(),
            purchase.amount()
        );
        records.push(Reconciliation::leftover(&purchase));
    }

    Ok(records)
}

/// Sorts, partitions and reconciles an unordered batch of transactions.
pub fn reconcile_transactions<I>(transactions: I, policy: MatchPolicy) -> Result<Vec<Reconciliation>>
where
    I: IntoIterator<Item = Transaction>,
{
    reconcile(StackPair::from_transactions(transactions), policy)
}
