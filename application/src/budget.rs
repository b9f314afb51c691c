//! Budget tracking: serialized spend accounting per billing period.
//!
//! The tracker is the only mutable shared state in the engine. All
//! mutation goes through [`BudgetTracker::record_spend`], which holds a
//! mutex for the duration of the update so concurrent tournament
//! participants never lose increments to a race.
//!
//! `record_spend` always records: a call that pushes the total past the
//! ceiling still lands in `spend_to_date` (the cost was incurred), and
//! the overage is reported back for the caller's policy to act on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// How a deployment reacts when a selection would blow the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Warn and proceed
    #[default]
    Soft,
    /// Reject the selection before any spend
    Hard,
}

impl std::str::FromStr for BudgetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(BudgetPolicy::Soft),
            "hard" => Ok(BudgetPolicy::Hard),
            other => Err(format!("unknown budget policy: {other}")),
        }
    }
}

/// Result of recording a spend amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpendOutcome {
    /// Recorded; total remains at or under the ceiling
    Recorded,
    /// Recorded, and the new total is strictly above the ceiling
    ExceededCeiling { overage: f64 },
}

impl SpendOutcome {
    pub fn exceeded(&self) -> bool {
        matches!(self, SpendOutcome::ExceededCeiling { .. })
    }
}

/// Snapshot of one period's budget state, for the budget query interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub period_id: String,
    pub spend_to_date: f64,
    pub ceiling: Option<f64>,
    /// `None` means unbounded
    pub remaining: Option<f64>,
}

/// Concurrency-safe running spend total per billing period.
///
/// Periods are keyed by year-month; a new period starts from zero, which
/// gives the atomic rollover the data model requires.
#[derive(Debug)]
pub struct BudgetTracker {
    spend_by_period: Mutex<HashMap<String, f64>>,
    ceiling: Option<f64>,
}

impl BudgetTracker {
    pub fn new(ceiling: Option<f64>) -> Self {
        Self {
            spend_by_period: Mutex::new(HashMap::new()),
            ceiling,
        }
    }

    /// Unbounded tracker (no ceiling)
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Tracker seeded with previously persisted period totals, so the
    /// ceiling holds across process restarts
    pub fn with_spend(ceiling: Option<f64>, spend: HashMap<String, f64>) -> Self {
        Self {
            spend_by_period: Mutex::new(spend),
            ceiling,
        }
    }

    /// Snapshot of every period's total, for persistence
    pub fn totals(&self) -> HashMap<String, f64> {
        self.spend_by_period
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The billing period id for the current wall-clock month
    pub fn current_period() -> String {
        chrono::Utc::now().format("%Y-%m").to_string()
    }

    /// Record `amount` against `period_id`. The only mutator.
    ///
    /// Always applies the amount; reports the overage when the new total
    /// is strictly above the ceiling.
    pub fn record_spend(&self, period_id: &str, amount: f64) -> SpendOutcome {
        let mut spend = self
            .spend_by_period
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let total = spend.entry(period_id.to_string()).or_insert(0.0);
        *total += amount;

        match self.ceiling {
            Some(ceiling) if *total > ceiling => SpendOutcome::ExceededCeiling {
                overage: *total - ceiling,
            },
            _ => SpendOutcome::Recorded,
        }
    }

    /// Overage that recording `amount` would cause, without recording it
    pub fn would_exceed(&self, period_id: &str, amount: f64) -> Option<f64> {
        let ceiling = self.ceiling?;
        let projected = self.spend_to_date(period_id) + amount;
        (projected > ceiling).then_some(projected - ceiling)
    }

    /// Headroom left in the period; `None` means unbounded
    pub fn remaining(&self, period_id: &str) -> Option<f64> {
        self.ceiling
            .map(|ceiling| (ceiling - self.spend_to_date(period_id)).max(0.0))
    }

    pub fn spend_to_date(&self, period_id: &str) -> f64 {
        let spend = self
            .spend_by_period
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        spend.get(period_id).copied().unwrap_or(0.0)
    }

    /// Budget query response for one period
    pub fn report(&self, period_id: &str) -> BudgetReport {
        BudgetReport {
            period_id: period_id.to_string(),
            spend_to_date: self.spend_to_date(period_id),
            ceiling: self.ceiling,
            remaining: self.remaining(period_id),
        }
    }
}
