//! Error types for the reconciler.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while loading, reconciling or writing a batch.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row that cannot be turned into a transaction
    #[error("Malformed input at row {row}: {message}")]
    MalformedInput { row: usize, message: String },

    /// A row flagged as both or neither of cash purchase and ATM withdrawal
    #[error("Ambiguous transaction kind at row {row} (is_cash={is_cash}, is_atm={is_atm})")]
    AmbiguousKind {
        row: usize,
        is_cash: bool,
        is_atm: bool,
    },

    /// Duplicate transaction ID within one batch
    #[error("Duplicate transaction ID {id} at row {row}")]
    DuplicateId { id: u64, row: usize },

    /// The matching loop reached a state it must never reach
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
