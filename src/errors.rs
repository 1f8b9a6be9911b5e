use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::TransactionKind;

/// Error type that captures every rejected savings operation.
///
/// None of these are fatal: callers render the `Display` text as a status
/// message and keep the session running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{kind} amount must be greater than 0.")]
    InvalidAmount { kind: TransactionKind, amount: Decimal },
    #[error("{kind} amount is too large for this goal's balance.")]
    AmountTooLarge { kind: TransactionKind, amount: Decimal },
    #[error("Target amount must not be negative.")]
    NegativeTarget(Decimal),
    #[error("Insufficient balance for this withdrawal.")]
    InsufficientFunds { requested: Decimal, available: Decimal },
    #[error("Goal name must not be empty.")]
    InvalidGoalName,
    #[error("Goal `{0}` not found.")]
    NotFound(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
