//! Processing sweep that materializes due recurring templates into ledger
//! transactions.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{Clock, CoreError, CoreResult};
use crate::domain::{RecurringStatus, Transaction, TransactionKind};
use crate::store::MemoryStore;

use super::transaction_service::link_expense_to_budget;
use super::BalanceService;

/// Result of one processing sweep.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// `(template, materialized transaction)` pairs.
    pub processed: Vec<(Uuid, Uuid)>,
    /// Templates that were due but skipped (validation, state conflict, or
    /// insufficient funds).
    pub skipped: Vec<Uuid>,
}

pub struct ProcessingService;

impl ProcessingService {
    /// Materializes every template due at the clock's current date. Each
    /// template runs in its own atomic unit; one failing template never
    /// prevents the rest of the sweep from committing.
    pub fn run_sweep(store: &MemoryStore, clock: &dyn Clock) -> SweepOutcome {
        let now = clock.now();
        let today = clock.today();
        let due: Vec<Uuid> = store.read(|state| {
            state
                .recurring
                .iter()
                .filter(|t| t.can_be_processed(today))
                .map(|t| t.id)
                .collect()
        });

        if due.is_empty() {
            debug!(%today, "no recurring transactions ready for processing");
            return SweepOutcome::default();
        }
        info!(count = due.len(), "found recurring transactions ready for processing");

        let mut outcome = SweepOutcome::default();
        for template_id in due {
            match Self::process_one(store, template_id, now) {
                Ok(transaction_id) => outcome.processed.push((template_id, transaction_id)),
                Err(err) => {
                    warn!(
                        template_id = %template_id,
                        error = %err,
                        "failed to process recurring transaction"
                    );
                    outcome.skipped.push(template_id);
                }
            }
        }
        info!(
            processed = outcome.processed.len(),
            skipped = outcome.skipped.len(),
            "completed recurring transaction sweep"
        );
        outcome
    }

    /// Processes a single template; also the manual hook for operational
    /// testing. Returns the id of the materialized transaction.
    ///
    /// The whole step is one atomic unit: the new transaction, its balance
    /// effect, any budget spend, and the template's schedule advance commit
    /// together or roll back together.
    pub fn process_one(
        store: &MemoryStore,
        template_id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<Uuid> {
        let today = now.date_naive();
        store.atomically(|state| {
            let template = state
                .template(template_id)
                .cloned()
                .ok_or(CoreError::TemplateNotFound(template_id))?;

            // Re-validate inside the unit: the row may have changed between
            // the due-date scan and this point.
            if !template.can_be_processed(today) {
                return Err(CoreError::InvalidOperation(
                    "recurring transaction is no longer ready for processing".into(),
                ));
            }
            if template.title.trim().is_empty() || template.amount <= 0.0 {
                return Err(CoreError::Validation(
                    "recurring transaction has empty or non-positive fields".into(),
                ));
            }

            if template.kind == TransactionKind::Expense {
                BalanceService::ensure_covered(state, template.user_id, template.amount)?;
            }
            BalanceService::apply(state, template.user_id, template.amount, template.kind)?;

            let mut txn = Transaction::new(
                template.user_id,
                template.title.clone(),
                template.description.clone(),
                template.amount,
                template.category,
                template.kind,
                today,
            );
            txn.recurring_generated = true;
            txn.recurring_id = Some(template.id);
            link_expense_to_budget(state, &mut txn)?;
            let transaction_id = txn.id;
            state.transactions.push(txn);

            let template = state
                .template_mut(template_id)
                .ok_or(CoreError::TemplateNotFound(template_id))?;
            template.occurrence_count += 1;
            template.last_created = Some(now);
            template.modified_at = now;
            // Replayed from the fixed start date, never from the previous
            // occurrence, so missed or paused periods cannot accumulate
            // drift.
            let next = template.derived_next_occurrence();
            template.next_occurrence = next;
            if template.end_date.map_or(false, |end| next > end) {
                template.status = RecurringStatus::Cancelled;
                info!(
                    template_id = %template_id,
                    "recurring transaction reached its end date and was cancelled"
                );
            }

            info!(
                template_id = %template_id,
                transaction_id = %transaction_id,
                "materialized recurring transaction"
            );
            Ok(transaction_id)
        })
    }
}
