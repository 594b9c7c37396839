//! Budget period management: creation, updates, and spend tracking.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::core::{CoreError, CoreResult};
use crate::domain::{Budget, Category, LedgerState, RenewalFrequency};
use crate::store::MemoryStore;

/// Input for creating a budget period.
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: Category,
    pub planned_amount: f64,
    pub start_date: NaiveDate,
    pub frequency: RenewalFrequency,
    pub auto_renew: bool,
    pub reminder: bool,
}

/// Mutable subset of a budget. Category and start date are immutable after
/// creation so transaction linkage and the non-overlap guarantee hold.
#[derive(Debug, Clone)]
pub struct BudgetUpdate {
    pub planned_amount: f64,
    pub frequency: RenewalFrequency,
    pub auto_renew: bool,
    pub reminder: bool,
}

pub struct BudgetService;

impl BudgetService {
    pub fn create(store: &MemoryStore, user_id: Uuid, input: NewBudget) -> CoreResult<Budget> {
        if input.planned_amount <= 0.0 {
            return Err(CoreError::Validation(
                "planned amount must be greater than 0".into(),
            ));
        }
        store.atomically(|state| {
            state
                .user(user_id)
                .ok_or(CoreError::UserNotFound(user_id))?;
            let budget = Budget::new(
                user_id,
                input.category,
                input.planned_amount,
                input.start_date,
                input.frequency,
                input.auto_renew,
                input.reminder,
            );
            Self::ensure_no_overlap(
                state,
                user_id,
                input.category,
                budget.start_date,
                budget.end_date,
                None,
            )?;
            info!(
                budget_id = %budget.id,
                user_id = %user_id,
                category = %budget.category,
                "budget created"
            );
            state.budgets.push(budget.clone());
            Ok(budget)
        })
    }

    pub fn update(
        store: &MemoryStore,
        user_id: Uuid,
        budget_id: Uuid,
        input: BudgetUpdate,
    ) -> CoreResult<Budget> {
        if input.planned_amount <= 0.0 {
            return Err(CoreError::Validation(
                "planned amount must be greater than 0".into(),
            ));
        }
        store.atomically(|state| {
            let (category, start_date) = {
                let budget = state
                    .budget(budget_id)
                    .filter(|b| b.user_id == user_id)
                    .ok_or(CoreError::BudgetNotFound(budget_id))?;
                (budget.category, budget.start_date)
            };
            // A frequency change moves the end date off the immutable start,
            // which can run the period into a sibling.
            let new_end = input.frequency.advance(start_date);
            Self::ensure_no_overlap(state, user_id, category, start_date, new_end, Some(budget_id))?;

            let budget = state
                .budget_mut(budget_id)
                .ok_or(CoreError::BudgetNotFound(budget_id))?;
            budget.planned_amount = input.planned_amount;
            budget.frequency = input.frequency;
            budget.end_date = new_end;
            budget.auto_renew = input.auto_renew;
            budget.reminder = input.reminder;
            info!(budget_id = %budget_id, user_id = %user_id, "budget updated");
            Ok(budget.clone())
        })
    }

    pub fn delete(store: &MemoryStore, user_id: Uuid, budget_id: Uuid) -> CoreResult<Budget> {
        store.atomically(|state| {
            let position = state
                .budgets
                .iter()
                .position(|b| b.id == budget_id && b.user_id == user_id)
                .ok_or(CoreError::BudgetNotFound(budget_id))?;
            let budget = state.budgets.remove(position);
            for txn in state
                .transactions
                .iter_mut()
                .filter(|t| t.budget_id == Some(budget_id))
            {
                txn.budget_id = None;
            }
            info!(budget_id = %budget_id, user_id = %user_id, "budget deleted");
            Ok(budget)
        })
    }

    pub fn get(store: &MemoryStore, user_id: Uuid, budget_id: Uuid) -> CoreResult<Budget> {
        store.read(|state| {
            state
                .budget(budget_id)
                .filter(|b| b.user_id == user_id)
                .cloned()
                .ok_or(CoreError::BudgetNotFound(budget_id))
        })
    }

    /// One user's budgets ordered by category, then period start.
    pub fn list(store: &MemoryStore, user_id: Uuid) -> Vec<Budget> {
        store.read(|state| {
            let mut items: Vec<Budget> = state.budgets_for(user_id).cloned().collect();
            items.sort_by(|a, b| {
                a.category
                    .as_str()
                    .cmp(b.category.as_str())
                    .then(a.start_date.cmp(&b.start_date))
            });
            items
        })
    }

    /// Adds an expense to a budget's spent amount.
    pub fn record_spend_in(
        state: &mut LedgerState,
        budget_id: Uuid,
        amount: f64,
    ) -> CoreResult<()> {
        let budget = state
            .budget_mut(budget_id)
            .ok_or(CoreError::BudgetNotFound(budget_id))?;
        budget.spent_amount += amount;
        Ok(())
    }

    /// Removes an expense's contribution; spent amount never goes negative.
    pub fn reverse_spend_in(
        state: &mut LedgerState,
        budget_id: Uuid,
        amount: f64,
    ) -> CoreResult<()> {
        let budget = state
            .budget_mut(budget_id)
            .ok_or(CoreError::BudgetNotFound(budget_id))?;
        budget.spent_amount = (budget.spent_amount - amount).max(0.0);
        Ok(())
    }

    /// The budget (at most one, by non-overlap) whose period covers an
    /// expense of this category on this date.
    pub fn matching_budget(
        state: &LedgerState,
        user_id: Uuid,
        category: Category,
        date: NaiveDate,
    ) -> Option<Uuid> {
        state
            .budgets_for(user_id)
            .find(|b| b.category == category && b.period_contains(date))
            .map(|b| b.id)
    }

    fn ensure_no_overlap(
        state: &LedgerState,
        user_id: Uuid,
        category: Category,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Uuid>,
    ) -> CoreResult<()> {
        let collision = state
            .budgets_for(user_id)
            .filter(|b| Some(b.id) != exclude)
            .any(|b| b.category == category && b.overlaps(start, end));
        if collision {
            Err(CoreError::BudgetOverlap(category))
        } else {
            Ok(())
        }
    }
}
