//! Goal reserve management: funding, withdrawal, and conversion to expense.

use tracing::info;
use uuid::Uuid;

use chrono::NaiveDate;

use crate::core::{Clock, CoreError, CoreResult};
use crate::domain::{Category, Goal, GoalPriority, GoalStatus, Transaction, TransactionKind};
use crate::store::MemoryStore;

use super::BalanceService;

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub target_date: NaiveDate,
    pub priority: GoalPriority,
    pub reminder: bool,
}

#[derive(Debug, Clone)]
pub struct GoalUpdate {
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub target_date: NaiveDate,
    pub priority: GoalPriority,
    pub reminder: bool,
}

pub struct GoalService;

impl GoalService {
    pub fn create(
        store: &MemoryStore,
        user_id: Uuid,
        input: NewGoal,
        clock: &dyn Clock,
    ) -> CoreResult<Goal> {
        validate_goal(&input.title, input.target_amount)?;
        store.atomically(|state| {
            state
                .user(user_id)
                .ok_or(CoreError::UserNotFound(user_id))?;
            let goal = Goal::new(
                user_id,
                input.title.clone(),
                input.description.clone(),
                input.target_amount,
                input.target_date,
                input.priority,
                input.reminder,
                clock.now(),
            );
            info!(goal_id = %goal.id, user_id = %user_id, "goal created");
            state.goals.push(goal.clone());
            Ok(goal)
        })
    }

    pub fn update(
        store: &MemoryStore,
        user_id: Uuid,
        goal_id: Uuid,
        input: GoalUpdate,
        clock: &dyn Clock,
    ) -> CoreResult<Goal> {
        validate_goal(&input.title, input.target_amount)?;
        store.atomically(|state| {
            let goal = state
                .goal_mut(goal_id)
                .filter(|g| g.user_id == user_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            goal.title = input.title.clone();
            goal.description = input.description.clone();
            goal.target_amount = input.target_amount;
            goal.target_date = input.target_date;
            goal.priority = input.priority;
            goal.reminder = input.reminder;
            goal.updated_at = clock.now();
            info!(goal_id = %goal_id, user_id = %user_id, "goal updated");
            Ok(goal.clone())
        })
    }

    /// Deletes a goal, releasing any remaining reserve back to the balance.
    pub fn delete(store: &MemoryStore, user_id: Uuid, goal_id: Uuid) -> CoreResult<Goal> {
        store.atomically(|state| {
            let position = state
                .goals
                .iter()
                .position(|g| g.id == goal_id && g.user_id == user_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            let goal = state.goals.remove(position);
            if goal.current_amount > 0.0 {
                BalanceService::adjust(state, user_id, goal.current_amount)?;
            }
            info!(goal_id = %goal_id, user_id = %user_id, "goal deleted");
            Ok(goal)
        })
    }

    /// Moves funds from the spendable balance into the goal's reserve.
    pub fn add_funds(
        store: &MemoryStore,
        user_id: Uuid,
        goal_id: Uuid,
        amount: f64,
        clock: &dyn Clock,
    ) -> CoreResult<Goal> {
        validate_amount(amount)?;
        store.atomically(|state| {
            state
                .goal(goal_id)
                .filter(|g| g.user_id == user_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            BalanceService::ensure_covered(state, user_id, amount)?;
            BalanceService::adjust(state, user_id, -amount)?;
            let goal = state
                .goal_mut(goal_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            goal.current_amount += amount;
            goal.updated_at = clock.now();
            info!(goal_id = %goal_id, user_id = %user_id, amount, "funds added to goal");
            Ok(goal.clone())
        })
    }

    /// Moves reserved funds back into the spendable balance.
    pub fn withdraw_funds(
        store: &MemoryStore,
        user_id: Uuid,
        goal_id: Uuid,
        amount: f64,
        clock: &dyn Clock,
    ) -> CoreResult<Goal> {
        validate_amount(amount)?;
        store.atomically(|state| {
            {
                let goal = state
                    .goal(goal_id)
                    .filter(|g| g.user_id == user_id)
                    .ok_or(CoreError::GoalNotFound(goal_id))?;
                if goal.current_amount < amount {
                    return Err(CoreError::InsufficientFunds(format!(
                        "goal reserve {:.2} does not cover {:.2}",
                        goal.current_amount, amount
                    )));
                }
            }
            BalanceService::adjust(state, user_id, amount)?;
            let goal = state
                .goal_mut(goal_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            goal.current_amount -= amount;
            goal.updated_at = clock.now();
            info!(goal_id = %goal_id, user_id = %user_id, amount, "funds withdrawn from goal");
            Ok(goal.clone())
        })
    }

    /// Converts reserved funds into an expense record.
    ///
    /// The funds left circulation when they were reserved, so the expense
    /// only records the expenditure; the balance is not debited again.
    #[allow(clippy::too_many_arguments)]
    pub fn convert_to_expense(
        store: &MemoryStore,
        user_id: Uuid,
        goal_id: Uuid,
        amount: f64,
        title: impl Into<String>,
        description: Option<String>,
        category: Category,
        clock: &dyn Clock,
    ) -> CoreResult<Transaction> {
        let title = title.into();
        validate_amount(amount)?;
        if title.trim().is_empty() {
            return Err(CoreError::Validation("title is required".into()));
        }
        store.atomically(|state| {
            {
                let goal = state
                    .goal(goal_id)
                    .filter(|g| g.user_id == user_id)
                    .ok_or(CoreError::GoalNotFound(goal_id))?;
                if goal.current_amount < amount {
                    return Err(CoreError::InsufficientFunds(format!(
                        "goal reserve {:.2} does not cover {:.2}",
                        goal.current_amount, amount
                    )));
                }
            }

            let txn = Transaction::new(
                user_id,
                title.clone(),
                description.clone(),
                amount,
                category,
                TransactionKind::Expense,
                clock.today(),
            );
            let transaction_id = txn.id;
            state.transactions.push(txn.clone());

            let goal = state
                .goal_mut(goal_id)
                .ok_or(CoreError::GoalNotFound(goal_id))?;
            goal.current_amount -= amount;
            goal.updated_at = clock.now();
            if goal.current_amount <= f64::EPSILON {
                goal.current_amount = 0.0;
                goal.status = GoalStatus::Completed;
                goal.active = false;
            }
            info!(
                goal_id = %goal_id,
                transaction_id = %transaction_id,
                amount,
                "goal reserve converted to expense"
            );
            Ok(txn)
        })
    }

    pub fn get(store: &MemoryStore, user_id: Uuid, goal_id: Uuid) -> CoreResult<Goal> {
        store.read(|state| {
            state
                .goal(goal_id)
                .filter(|g| g.user_id == user_id)
                .cloned()
                .ok_or(CoreError::GoalNotFound(goal_id))
        })
    }

    /// One user's goals ordered by priority (high first), then target date.
    pub fn list(store: &MemoryStore, user_id: Uuid) -> Vec<Goal> {
        store.read(|state| {
            let mut items: Vec<Goal> = state.goals_for(user_id).cloned().collect();
            items.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.target_date.cmp(&b.target_date)));
            items
        })
    }
}

fn validate_goal(title: &str, target_amount: f64) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if title.trim().len() < 2 || title.len() > 100 {
        return Err(CoreError::Validation(
            "title must be between 2 and 100 characters".into(),
        ));
    }
    if target_amount <= 0.0 {
        return Err(CoreError::Validation(
            "target amount must be greater than 0".into(),
        ));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> CoreResult<()> {
    if amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be greater than 0".into(),
        ));
    }
    Ok(())
}
