use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::core::session::Session;
use crate::currency::{format_date, format_rupiah};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{GoalPlan, Ledger, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Rejected,
}

/// Status plus the user-facing lines produced by one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub status: OutcomeStatus,
    pub messages: Vec<String>,
    pub error: Option<LedgerError>,
}

impl OperationOutcome {
    fn success(messages: Vec<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            messages,
            error: None,
        }
    }

    fn rejected(error: LedgerError) -> Self {
        Self {
            status: OutcomeStatus::Rejected,
            messages: vec![error.to_string()],
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn message(&self) -> String {
        self.messages.join("\n")
    }
}

impl From<LedgerResult<Vec<String>>> for OperationOutcome {
    fn from(result: LedgerResult<Vec<String>>) -> Self {
        match result {
            Ok(messages) => OperationOutcome::success(messages),
            Err(error) => OperationOutcome::rejected(error),
        }
    }
}

/// Actions a presentation layer triggers against a session.
pub struct SavingsService;

impl SavingsService {
    pub fn save_goal(
        session: &mut Session,
        goal_name: &str,
        target_amount: Decimal,
        duration_months: u32,
        start_date: NaiveDate,
    ) -> OperationOutcome {
        let policy = session.replace_policy();
        let saved = session.registry_mut().create_or_replace(
            goal_name,
            target_amount,
            duration_months,
            start_date,
            policy,
        );
        saved
            .map(|plan| Self::plan_messages(session, &plan))
            .into()
    }

    pub fn deposit(session: &mut Session, goal_name: &str, amount: Decimal) -> OperationOutcome {
        Self::record(session, goal_name, TransactionKind::Deposit, amount)
    }

    pub fn withdraw(session: &mut Session, goal_name: &str, amount: Decimal) -> OperationOutcome {
        Self::record(session, goal_name, TransactionKind::Withdrawal, amount)
    }

    pub fn lookup<'a>(session: &'a Session, goal_name: &str) -> LedgerResult<&'a Ledger> {
        session.registry().lookup(goal_name)
    }

    /// Renders the recommendation and target date lines for a saved plan.
    pub fn plan_messages(session: &Session, plan: &GoalPlan) -> Vec<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(monthly) = plan.monthly_contribution {
            messages.push(format!(
                "You need to save {} per month.",
                format_rupiah(monthly, session.locale())
            ));
        }
        messages.push(format!("Target date: {}", format_date(plan.target_date)));
        messages
    }

    fn record(
        session: &mut Session,
        goal_name: &str,
        kind: TransactionKind,
        amount: Decimal,
    ) -> OperationOutcome {
        let today = session.today();
        let locale = *session.locale();
        debug!(goal = goal_name, %kind, %amount, "recording transaction");

        let result = session.registry_mut().lookup_mut(goal_name).and_then(|ledger| {
            match kind {
                TransactionKind::Deposit => ledger.deposit(amount, today).map(|_| ()),
                TransactionKind::Withdrawal => ledger.withdraw(amount, today).map(|_| ()),
            }?;
            let verb = match kind {
                TransactionKind::Deposit => "Deposited",
                TransactionKind::Withdrawal => "Withdrew",
            };
            Ok(vec![format!(
                "{} {}. Balance is now {}.",
                verb,
                format_rupiah(amount, &locale),
                format_rupiah(ledger.balance(), &locale)
            )])
        });
        result.into()
    }
}
