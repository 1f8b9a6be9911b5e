use std::fmt;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weeks counted for every planned month; a twelve month goal lands 48 weeks
/// after its start date.
pub const WEEKS_PER_MONTH: i64 = 4;

/// Returns `start` shifted by `4 × months` weeks, saturating at the last
/// representable date.
pub fn target_date_from(start: NaiveDate, months: u32) -> NaiveDate {
    Duration::try_weeks(WEEKS_PER_MONTH * i64::from(months))
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(NaiveDate::MAX)
}

/// Recommended monthly contribution, only defined when both inputs are positive.
pub fn monthly_contribution(target_amount: Decimal, months: u32) -> Option<Decimal> {
    if target_amount > Decimal::ZERO && months > 0 {
        target_amount.checked_div(Decimal::from(months))
    } else {
        None
    }
}

/// Planning figures derived when a goal is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalPlan {
    pub target_amount: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub monthly_contribution: Option<Decimal>,
}

impl GoalPlan {
    /// Negative targets are clamped to zero, matching the ledger.
    pub fn new(target_amount: Decimal, duration_months: u32, start_date: NaiveDate) -> Self {
        let target_amount = target_amount.max(Decimal::ZERO);
        Self {
            target_amount,
            duration_months,
            start_date,
            target_date: target_date_from(start_date, duration_months),
            monthly_contribution: monthly_contribution(target_amount, duration_months),
        }
    }

    /// Signed number of days from `today` until the target date.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    pub fn deadline_status(&self, today: NaiveDate) -> DeadlineStatus {
        DeadlineStatus::from_days(self.days_remaining(today))
    }
}

/// Where `today` sits relative to a goal's target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineStatus {
    Remaining(u64),
    Today,
    Passed(u64),
}

impl DeadlineStatus {
    pub fn from_days(days: i64) -> Self {
        match days {
            0 => DeadlineStatus::Today,
            d if d > 0 => DeadlineStatus::Remaining(d.unsigned_abs()),
            d => DeadlineStatus::Passed(d.unsigned_abs()),
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineStatus::Remaining(days) => write!(f, "{} days remaining", days),
            DeadlineStatus::Today => f.write_str("today is the target date"),
            DeadlineStatus::Passed(days) => write!(f, "target date passed by {} days", days),
        }
    }
}
