use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::currency::{format_date, format_number, format_rupiah, LocaleConfig};
use crate::ledger::{DeadlineStatus, Ledger, Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            kind: txn.kind(),
            amount: txn.amount(),
            date: txn.date(),
        }
    }
}

/// Two-category aggregate backing the deposited-vs-withdrawn chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTotals {
    pub deposited: Decimal,
    pub withdrawn: Decimal,
}

impl TransactionTotals {
    pub fn bars(&self) -> [(TransactionKind, Decimal); 2] {
        [
            (TransactionKind::Deposit, self.deposited),
            (TransactionKind::Withdrawal, self.withdrawn),
        ]
    }
}

/// Snapshot of one ledger prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReport {
    pub goal_name: String,
    pub balance: Decimal,
    pub target_amount: Decimal,
    pub duration_months: u32,
    pub shortfall: Decimal,
    pub progress_percent: Option<Decimal>,
    pub monthly_contribution: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
    pub deadline: Option<DeadlineStatus>,
    pub rows: Vec<TransactionRow>,
    /// Absent while the history is empty or a sum leaves the `Decimal` range.
    pub totals: Option<TransactionTotals>,
}

impl LedgerReport {
    pub fn has_transactions(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Headline figures, one per line.
    pub fn summary_lines(&self, locale: &LocaleConfig) -> Vec<String> {
        let mut lines = vec![format!("Total balance: {}", format_rupiah(self.balance, locale))];
        if self.target_amount > Decimal::ZERO {
            lines.push(format!(
                "Target: {}",
                format_rupiah(self.target_amount, locale)
            ));
            lines.push(format!(
                "Shortfall: {}",
                format_rupiah(self.shortfall, locale)
            ));
        }
        if let Some(progress) = self.progress_percent {
            lines.push(format!("Progress: {}%", format_number(locale, progress)));
        }
        if let Some(monthly) = self.monthly_contribution {
            lines.push(format!(
                "Monthly contribution: {}",
                format_rupiah(monthly, locale)
            ));
        }
        if let (Some(date), Some(deadline)) = (self.target_date, self.deadline) {
            lines.push(format!("Target date: {} ({})", format_date(date), deadline));
        }
        lines
    }
}

pub struct ReportService;

impl ReportService {
    pub fn report(ledger: &Ledger, today: NaiveDate) -> LedgerReport {
        let plan = ledger.plan();
        let rows: Vec<TransactionRow> = ledger.history().iter().map(TransactionRow::from).collect();
        let totals = if rows.is_empty() {
            None
        } else {
            let totals = ledger
                .total_deposited()
                .zip(ledger.total_withdrawn())
                .map(|(deposited, withdrawn)| TransactionTotals {
                    deposited,
                    withdrawn,
                });
            if totals.is_none() {
                warn!(goal = ledger.goal_name(), "transaction totals overflow");
            }
            totals
        };

        LedgerReport {
            goal_name: ledger.goal_name().to_string(),
            balance: ledger.balance(),
            target_amount: ledger.target_amount(),
            duration_months: ledger.duration_months(),
            shortfall: ledger.shortfall(),
            progress_percent: ledger.progress_percent(),
            monthly_contribution: plan.and_then(|plan| plan.monthly_contribution),
            target_date: plan.map(|plan| plan.target_date),
            deadline: plan.map(|plan| plan.deadline_status(today)),
            rows,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::GoalPlan;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn laptop() -> Ledger {
        Ledger::from_plan("Laptop", GoalPlan::new(dec!(12000000), 12, start()))
    }

    #[test]
    fn empty_history_has_no_totals() {
        let report = ReportService::report(&laptop(), start());
        assert!(!report.has_transactions());
        assert_eq!(report.totals, None);
        assert_eq!(report.deadline, Some(DeadlineStatus::Remaining(336)));
    }

    #[test]
    fn totals_split_deposits_and_withdrawals() {
        let mut ledger = laptop();
        ledger.deposit(dec!(500000), start()).unwrap();
        ledger.deposit(dec!(250000), start()).unwrap();
        ledger.withdraw(dec!(100000), start()).unwrap();

        let report = ReportService::report(&ledger, start());
        let totals = report.totals.expect("totals");
        assert_eq!(totals.deposited, dec!(750000));
        assert_eq!(totals.withdrawn, dec!(100000));
        assert_eq!(totals.bars()[1], (TransactionKind::Withdrawal, dec!(100000)));
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[2].kind, TransactionKind::Withdrawal);
        assert_eq!(report.balance, dec!(650000));
        assert_eq!(report.shortfall, dec!(-11350000));
    }

    #[test]
    fn summary_lines_render_deadline() {
        let mut ledger = laptop();
        ledger.deposit(dec!(3000000), start()).unwrap();
        let today = start() + Duration::weeks(48) + Duration::days(10);
        let lines = ReportService::report(&ledger, today).summary_lines(&LocaleConfig::default());
        assert_eq!(
            lines,
            vec![
                "Total balance: Rp 3.000.000".to_string(),
                "Target: Rp 12.000.000".to_string(),
                "Shortfall: Rp -9.000.000".to_string(),
                "Progress: 25%".to_string(),
                "Monthly contribution: Rp 1.000.000".to_string(),
                "Target date: 02 December 2024 (target date passed by 10 days)".to_string(),
            ]
        );
    }

    #[test]
    fn overflowing_totals_leave_chart_out() {
        let mut ledger = Ledger::new("Big", dec!(0), 0);
        ledger.deposit(Decimal::MAX, start()).unwrap();
        ledger.withdraw(Decimal::MAX, start()).unwrap();
        ledger.deposit(dec!(1), start()).unwrap();

        let report = ReportService::report(&ledger, start());
        assert!(report.has_transactions());
        assert_eq!(report.totals, None);
        assert_eq!(report.balance, dec!(1));
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn unplanned_ledger_has_no_deadline() {
        let report = ReportService::report(&Ledger::default(), start());
        assert_eq!(report.deadline, None);
        assert_eq!(
            report.summary_lines(&LocaleConfig::default()),
            vec!["Total balance: Rp 0".to_string()]
        );
    }
}
