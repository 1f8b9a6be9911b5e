use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{GoalPlan, Ledger};

/// What saving a goal under an existing name does to that goal's ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Start over with a fresh ledger; prior balance and history are discarded.
    #[default]
    Replace,
    /// Keep balance and history, only update target and duration.
    UpdateInPlace,
}

impl ReplacePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "replace" => Some(ReplacePolicy::Replace),
            "update" | "update_in_place" => Some(ReplacePolicy::UpdateInPlace),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReplacePolicy::Replace => "replace",
            ReplacePolicy::UpdateInPlace => "update_in_place",
        }
    }
}

/// Ledgers keyed by goal name, iterated in the order goals were first saved.
#[derive(Debug, Default, Clone)]
pub struct LedgerRegistry {
    ledgers: HashMap<String, Ledger>,
    order: Vec<String>,
}

impl LedgerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a goal and returns its plan. An empty name or a negative target is
    /// rejected before anything is touched.
    pub fn create_or_replace(
        &mut self,
        goal_name: &str,
        target_amount: Decimal,
        duration_months: u32,
        start_date: NaiveDate,
        policy: ReplacePolicy,
    ) -> LedgerResult<GoalPlan> {
        if goal_name.is_empty() {
            warn!("rejected goal with empty name");
            return Err(LedgerError::InvalidGoalName);
        }
        if target_amount < Decimal::ZERO {
            warn!(goal = goal_name, %target_amount, "rejected negative target");
            return Err(LedgerError::NegativeTarget(target_amount));
        }
        let plan = GoalPlan::new(target_amount, duration_months, start_date);

        match self.ledgers.get_mut(goal_name) {
            Some(existing) => match policy {
                ReplacePolicy::Replace => {
                    warn!(
                        goal = goal_name,
                        discarded_transactions = existing.transaction_count(),
                        discarded_balance = %existing.balance(),
                        "goal saved again; replacing its ledger"
                    );
                    *existing = Ledger::from_plan(goal_name, plan.clone());
                }
                ReplacePolicy::UpdateInPlace => {
                    info!(goal = goal_name, "goal saved again; updating plan in place");
                    existing.replan(plan.clone());
                }
            },
            None => {
                info!(goal = goal_name, %target_amount, duration_months, "goal created");
                self.ledgers
                    .insert(goal_name.to_string(), Ledger::from_plan(goal_name, plan.clone()));
                self.order.push(goal_name.to_string());
            }
        }
        Ok(plan)
    }

    pub fn lookup(&self, goal_name: &str) -> LedgerResult<&Ledger> {
        self.ledgers.get(goal_name).ok_or_else(|| {
            debug!(goal = goal_name, "lookup miss");
            LedgerError::NotFound(goal_name.to_string())
        })
    }

    pub fn lookup_mut(&mut self, goal_name: &str) -> LedgerResult<&mut Ledger> {
        self.ledgers
            .get_mut(goal_name)
            .ok_or_else(|| LedgerError::NotFound(goal_name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn ledgers(&self) -> impl Iterator<Item = &Ledger> + '_ {
        self.order.iter().filter_map(|name| self.ledgers.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = LedgerRegistry::new();
        let err = registry
            .create_or_replace("", dec!(100), 1, start(), ReplacePolicy::Replace)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidGoalName);
        assert!(registry.is_empty());

        registry
            .create_or_replace("   ", dec!(100), 1, start(), ReplacePolicy::Replace)
            .expect("whitespace is a name");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["   "]);
    }

    #[test]
    fn negative_target_is_rejected_and_existing_goal_kept() {
        let mut registry = LedgerRegistry::new();
        registry
            .create_or_replace("Bike", dec!(500), 2, start(), ReplacePolicy::Replace)
            .unwrap();
        registry
            .lookup_mut("Bike")
            .unwrap()
            .deposit(dec!(200), start())
            .unwrap();

        let err = registry
            .create_or_replace("Bike", dec!(-1), 2, start(), ReplacePolicy::Replace)
            .unwrap_err();
        assert_eq!(err, LedgerError::NegativeTarget(dec!(-1)));
        assert_eq!(err.to_string(), "Target amount must not be negative.");

        let ledger = registry.lookup("Bike").unwrap();
        assert_eq!(ledger.balance(), dec!(200));
        assert_eq!(ledger.target_amount(), dec!(500));
        assert_eq!(ledger.plan().map(|plan| plan.target_amount), Some(dec!(500)));
    }

    #[test]
    fn lookup_on_empty_registry_is_not_found() {
        let registry = LedgerRegistry::new();
        assert_eq!(
            registry.lookup("Laptop").unwrap_err(),
            LedgerError::NotFound("Laptop".into())
        );
    }

    #[test]
    fn create_returns_plan_and_fresh_ledger() {
        let mut registry = LedgerRegistry::new();
        let plan = registry
            .create_or_replace("Laptop", dec!(12000000), 12, start(), ReplacePolicy::Replace)
            .expect("create");
        assert_eq!(plan.monthly_contribution, Some(dec!(1000000)));
        let ledger = registry.lookup("Laptop").expect("lookup");
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert_eq!(ledger.target_amount(), dec!(12000000));
        assert_eq!(ledger.duration_months(), 12);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn replace_policy_discards_existing_history() {
        let mut registry = LedgerRegistry::new();
        registry
            .create_or_replace("Bike", dec!(500), 2, start(), ReplacePolicy::Replace)
            .unwrap();
        registry
            .lookup_mut("Bike")
            .unwrap()
            .deposit(dec!(200), start())
            .unwrap();
        registry
            .create_or_replace("Bike", dec!(800), 4, start(), ReplacePolicy::Replace)
            .unwrap();

        let ledger = registry.lookup("Bike").unwrap();
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.target_amount(), dec!(800));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_in_place_keeps_history() {
        let mut registry = LedgerRegistry::new();
        registry
            .create_or_replace("Bike", dec!(500), 2, start(), ReplacePolicy::UpdateInPlace)
            .unwrap();
        registry
            .lookup_mut("Bike")
            .unwrap()
            .deposit(dec!(200), start())
            .unwrap();
        registry
            .create_or_replace("Bike", dec!(800), 4, start(), ReplacePolicy::UpdateInPlace)
            .unwrap();

        let ledger = registry.lookup("Bike").unwrap();
        assert_eq!(ledger.balance(), dec!(200));
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.target_amount(), dec!(800));
        assert_eq!(ledger.duration_months(), 4);
    }

    #[test]
    fn names_follow_insertion_order() {
        let mut registry = LedgerRegistry::new();
        for name in ["Laptop", "Bike", "Trip", "Bike"] {
            registry
                .create_or_replace(name, dec!(1), 1, start(), ReplacePolicy::Replace)
                .unwrap();
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Laptop", "Bike", "Trip"]);
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!(ReplacePolicy::parse("Replace"), Some(ReplacePolicy::Replace));
        assert_eq!(ReplacePolicy::parse("update"), Some(ReplacePolicy::UpdateInPlace));
        assert_eq!(
            ReplacePolicy::parse("update-in-place"),
            Some(ReplacePolicy::UpdateInPlace)
        );
        assert_eq!(ReplacePolicy::parse("merge"), None);
    }
}
