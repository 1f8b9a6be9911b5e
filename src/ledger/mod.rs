//! Savings ledger models: transactions, the per-goal ledger and goal planning.

pub mod goal;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use goal::{monthly_contribution, target_date_from, DeadlineStatus, GoalPlan};
pub use ledger::Ledger;
pub use transaction::{Transaction, TransactionKind};
