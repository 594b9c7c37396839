//! Auto-renewal sweep spawning successor budget periods.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{Clock, CoreError, CoreResult};
use crate::domain::Budget;
use crate::store::MemoryStore;

/// Result of one renewal sweep.
#[derive(Debug, Default)]
pub struct RenewalOutcome {
    /// `(expired budget, successor budget)` pairs.
    pub renewed: Vec<(Uuid, Uuid)>,
    /// Budgets that were due but failed validation or renewal.
    pub skipped: Vec<Uuid>,
}

pub struct RenewalService;

impl RenewalService {
    /// Renews every budget with auto-renewal enabled whose period has
    /// ended. Each budget renews in its own atomic unit; a failing budget
    /// is logged and skipped without affecting the rest of the sweep.
    pub fn run_sweep(store: &MemoryStore, clock: &dyn Clock) -> RenewalOutcome {
        let now = clock.now();
        let today = clock.today();
        let due: Vec<Uuid> = store.read(|state| {
            state
                .budgets
                .iter()
                .filter(|b| b.auto_renew && b.is_expired(today))
                .map(|b| b.id)
                .collect()
        });

        if due.is_empty() {
            debug!(%today, "no budgets eligible for renewal");
            return RenewalOutcome::default();
        }
        info!(count = due.len(), "found budgets eligible for renewal");

        let mut outcome = RenewalOutcome::default();
        for budget_id in due {
            match Self::renew_one(store, budget_id, now) {
                Ok(successor_id) => outcome.renewed.push((budget_id, successor_id)),
                Err(err) => {
                    warn!(budget_id = %budget_id, error = %err, "failed to renew budget");
                    outcome.skipped.push(budget_id);
                }
            }
        }
        info!(
            renewed = outcome.renewed.len(),
            skipped = outcome.skipped.len(),
            "completed budget renewal sweep"
        );
        outcome
    }

    /// Renews a single budget; also the manual hook for operational
    /// testing. Returns the successor's id.
    pub fn renew_one(
        store: &MemoryStore,
        budget_id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<Uuid> {
        store.atomically(|state| {
            let old = state
                .budget(budget_id)
                .cloned()
                .ok_or(CoreError::BudgetNotFound(budget_id))?;
            if !old.auto_renew {
                return Err(CoreError::InvalidOperation(
                    "auto-renewal is not enabled for this budget".into(),
                ));
            }
            if old.planned_amount <= 0.0 {
                return Err(CoreError::Validation(
                    "budget has a non-positive planned amount".into(),
                ));
            }
            state
                .user(old.user_id)
                .ok_or(CoreError::UserNotFound(old.user_id))?;

            let successor = Budget {
                id: Uuid::new_v4(),
                user_id: old.user_id,
                category: old.category,
                planned_amount: old.planned_amount,
                spent_amount: 0.0,
                reminder: old.reminder,
                start_date: old.end_date,
                end_date: old.frequency.advance(old.end_date),
                frequency: old.frequency,
                auto_renew: true,
                renewal_count: old.renewal_count + 1,
                last_renewal: Some(now),
            };
            let successor_id = successor.id;

            // Disabling auto-renewal on the expired period prevents a
            // second sweep from spawning a duplicate chain.
            let expired = state
                .budget_mut(budget_id)
                .ok_or(CoreError::BudgetNotFound(budget_id))?;
            expired.auto_renew = false;
            expired.last_renewal = Some(now);

            state.budgets.push(successor);
            info!(
                old_budget_id = %budget_id,
                new_budget_id = %successor_id,
                "renewed budget into successor period"
            );
            Ok(successor_id)
        })
    }
}
