use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    goal::GoalPlan,
    transaction::{Transaction, TransactionKind},
};
use crate::errors::{LedgerError, LedgerResult};

/// Balance, goal and append-only history for one savings goal.
///
/// `balance` always equals deposits minus withdrawals over `history`; it is
/// only ever changed together with an append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    goal_name: String,
    balance: Decimal,
    target_amount: Decimal,
    duration_months: u32,
    #[serde(default)]
    plan: Option<GoalPlan>,
    #[serde(default)]
    history: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new("", Decimal::ZERO, 0)
    }
}

impl Ledger {
    pub fn new(goal_name: impl Into<String>, target_amount: Decimal, duration_months: u32) -> Self {
        Self {
            goal_name: goal_name.into(),
            balance: Decimal::ZERO,
            target_amount: target_amount.max(Decimal::ZERO),
            duration_months,
            plan: None,
            history: Vec::new(),
        }
    }

    /// Builds a ledger from a saved goal plan, keeping the plan for reports.
    pub fn from_plan(goal_name: impl Into<String>, plan: GoalPlan) -> Self {
        let mut ledger = Self::new(goal_name, plan.target_amount, plan.duration_months);
        ledger.plan = Some(plan);
        ledger
    }

    pub fn deposit(&mut self, amount: Decimal, today: NaiveDate) -> LedgerResult<&Transaction> {
        Self::ensure_positive(TransactionKind::Deposit, amount)?;
        let Some(balance) = self.balance.checked_add(amount) else {
            warn!(
                goal = %self.goal_name,
                %amount,
                balance = %self.balance,
                "deposit rejected: balance overflow"
            );
            return Err(LedgerError::AmountTooLarge {
                kind: TransactionKind::Deposit,
                amount,
            });
        };
        self.balance = balance;
        info!(goal = %self.goal_name, %amount, balance = %self.balance, "deposit recorded");
        Ok(self.append(TransactionKind::Deposit, amount, today))
    }

    pub fn withdraw(&mut self, amount: Decimal, today: NaiveDate) -> LedgerResult<&Transaction> {
        Self::ensure_positive(TransactionKind::Withdrawal, amount)?;
        if amount > self.balance {
            warn!(
                goal = %self.goal_name,
                requested = %amount,
                available = %self.balance,
                "withdrawal rejected: insufficient funds"
            );
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        info!(goal = %self.goal_name, %amount, balance = %self.balance, "withdrawal recorded");
        Ok(self.append(TransactionKind::Withdrawal, amount, today))
    }

    /// Updates target and horizon without touching balance or history.
    pub fn replan(&mut self, plan: GoalPlan) {
        self.target_amount = plan.target_amount.max(Decimal::ZERO);
        self.duration_months = plan.duration_months;
        self.plan = Some(plan);
    }

    pub fn goal_name(&self) -> &str {
        &self.goal_name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn target_amount(&self) -> Decimal {
        self.target_amount
    }

    pub fn duration_months(&self) -> u32 {
        self.duration_months
    }

    pub fn plan(&self) -> Option<&GoalPlan> {
        self.plan.as_ref()
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn transaction_count(&self) -> usize {
        self.history.len()
    }

    /// Sum of accepted deposits, `None` if it exceeds the representable range.
    pub fn total_deposited(&self) -> Option<Decimal> {
        self.total_of(TransactionKind::Deposit)
    }

    pub fn total_withdrawn(&self) -> Option<Decimal> {
        self.total_of(TransactionKind::Withdrawal)
    }

    /// `balance - target`: negative while still short, positive once exceeded.
    pub fn shortfall(&self) -> Decimal {
        self.balance - self.target_amount
    }

    /// Share of the target already saved, or `None` while no target is set.
    pub fn progress_percent(&self) -> Option<Decimal> {
        if self.target_amount <= Decimal::ZERO {
            return None;
        }
        self.balance
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(self.target_amount))
    }

    fn total_of(&self, kind: TransactionKind) -> Option<Decimal> {
        self.history
            .iter()
            .filter(|txn| txn.kind() == kind)
            .try_fold(Decimal::ZERO, |total, txn| total.checked_add(txn.amount()))
    }

    fn ensure_positive(kind: TransactionKind, amount: Decimal) -> LedgerResult<()> {
        if amount <= Decimal::ZERO {
            warn!(%kind, %amount, "rejected non-positive amount");
            return Err(LedgerError::InvalidAmount { kind, amount });
        }
        Ok(())
    }

    fn append(&mut self, kind: TransactionKind, amount: Decimal, date: NaiveDate) -> &Transaction {
        self.history.push(Transaction::new(kind, amount, date));
        &self.history[self.history.len() - 1]
    }
}
