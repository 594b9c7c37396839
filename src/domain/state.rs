//! The persisted aggregate the store owns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Budget, DailySnapshot, Goal, RecurringTemplate, Transaction, UserAccount};

/// Every collection the engine works over, as one serializable aggregate.
///
/// Services operate on `&mut LedgerState` inside a store-managed atomic
/// unit; the aggregate itself enforces nothing beyond lookup helpers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub users: Vec<UserAccount>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub recurring: Vec<RecurringTemplate>,
    pub goals: Vec<Goal>,
    pub snapshots: Vec<DailySnapshot>,
}

impl LedgerState {
    pub fn user(&self, id: Uuid) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut UserAccount> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|t| t.id == id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|b| b.id == id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    pub fn template(&self, id: Uuid) -> Option<&RecurringTemplate> {
        self.recurring.iter().find(|r| r.id == id)
    }

    pub fn template_mut(&mut self, id: Uuid) -> Option<&mut RecurringTemplate> {
        self.recurring.iter_mut().find(|r| r.id == id)
    }

    /// Budgets belonging to one user, in insertion order.
    pub fn budgets_for(&self, user_id: Uuid) -> impl Iterator<Item = &Budget> {
        self.budgets.iter().filter(move |b| b.user_id == user_id)
    }

    /// Transactions belonging to one user, in insertion order.
    pub fn transactions_for(&self, user_id: Uuid) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.user_id == user_id)
    }

    /// Goals belonging to one user, in insertion order.
    pub fn goals_for(&self, user_id: Uuid) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(move |g| g.user_id == user_id)
    }
}
