//! # ATM Reconcile
//!
//! Batch reconciliation of cash purchases against ATM withdrawals on one
//! account. Each purchase is explained by the most recent withdrawals made
//! before it; what no withdrawal covers is reported as a leftover.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts are `rust_decimal` values, never floats
//! - **Stack-based greedy matching**: newest purchase against newest older withdrawal
//! - **Conservation**: the records for a purchase always add up to its amount
//! - **Per-file isolation**: one bad input file never stops the others
//!
//! ## Example
//!
//! ```
//! use atm_reconcile::{OutputFormat, ReconcileEngine};
//! use std::io::Cursor;
//!
//! let csv = "id,name,amount,date,is_cash,is_atm\n\
//!            1,ATM,100,2020-01-01,false,true\n\
//!            2,Grocer,40,2020-01-02,true,false\n";
//! let mut engine = ReconcileEngine::new();
//! engine.load_csv(Cursor::new(csv)).unwrap();
//! engine.reconcile().unwrap();
//! engine.write_output(std::io::stdout(), OutputFormat::Legacy).unwrap();
//! ```

pub mod amount;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod reconciler;
pub mod reconciliation;
pub mod stacks;
pub mod transaction;

pub use amount::Amount;
pub use engine::ReconcileEngine;
pub use error::{ReconcileError, Result};
pub use output::OutputFormat;
pub use reconciler::{reconcile, reconcile_transactions, settle, MatchPolicy};
pub use reconciliation::Reconciliation;
pub use stacks::StackPair;
pub use transaction::{ChronoKey, Transaction, TransactionRow, TxKind};
