//! Read-only summary queries derived from the ledger entities.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::core::Clock;
use crate::domain::{Category, GoalStatus, Transaction, TransactionKind};
use crate::store::MemoryStore;

const RECENT_LIMIT: usize = 10;

/// Aggregates over the current calendar month's transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionSummary {
    pub total_transactions: usize,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
    pub category_breakdown: HashMap<Category, f64>,
    pub recent: Vec<Transaction>,
}

/// Aggregates over a user's goals.
#[derive(Debug, Clone, Default)]
pub struct GoalSummary {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub overdue_goals: usize,
    pub total_target_amount: f64,
    pub total_reserved_amount: f64,
    pub total_remaining_amount: f64,
    pub overall_progress: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Summarizes the calendar month containing the clock's current date.
    pub fn transaction_summary(
        store: &MemoryStore,
        user_id: Uuid,
        clock: &dyn Clock,
    ) -> TransactionSummary {
        let today = clock.today();
        let start_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        let start_of_next = if today.month() == 12 {
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1).unwrap()
        };

        store.read(|state| {
            let mut summary = TransactionSummary::default();
            let mut in_month: Vec<&Transaction> = state
                .transactions_for(user_id)
                .filter(|t| t.date >= start_of_month && t.date < start_of_next)
                .collect();

            summary.total_transactions = in_month.len();
            for txn in &in_month {
                match txn.kind {
                    TransactionKind::Income => summary.total_income += txn.amount,
                    TransactionKind::Expense => summary.total_expenses += txn.amount,
                }
                *summary.category_breakdown.entry(txn.category).or_default() += txn.amount;
            }
            summary.net_amount = summary.total_income - summary.total_expenses;

            in_month.sort_by(|a, b| b.date.cmp(&a.date));
            summary.recent = in_month
                .into_iter()
                .take(RECENT_LIMIT)
                .cloned()
                .collect();
            summary
        })
    }

    pub fn goal_summary(store: &MemoryStore, user_id: Uuid, clock: &dyn Clock) -> GoalSummary {
        let today = clock.today();
        store.read(|state| {
            let goals: Vec<_> = state.goals_for(user_id).collect();
            let mut summary = GoalSummary {
                total_goals: goals.len(),
                ..GoalSummary::default()
            };
            for goal in &goals {
                if goal.holds_reserve() {
                    summary.active_goals += 1;
                }
                if goal.status == GoalStatus::Completed
                    || goal.current_amount >= goal.target_amount
                {
                    summary.completed_goals += 1;
                }
                if goal.is_overdue(today) {
                    summary.overdue_goals += 1;
                }
                summary.total_target_amount += goal.target_amount;
                summary.total_reserved_amount += goal.current_amount;
                summary.total_remaining_amount +=
                    (goal.target_amount - goal.current_amount).max(0.0);
            }
            if summary.total_target_amount > 0.0 {
                summary.overall_progress =
                    (summary.total_reserved_amount / summary.total_target_amount) * 100.0;
            }
            summary
        })
    }
}
