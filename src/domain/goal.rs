//! Savings goals and their reserved funds.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalStatus::Active => "Active",
            GoalStatus::Completed => "Completed",
            GoalStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalPriority::Low => "Low",
            GoalPriority::Medium => "Medium",
            GoalPriority::High => "High",
        };
        f.write_str(label)
    }
}

/// A savings target holding funds set aside from the spendable balance.
///
/// `current_amount` only grows by matched debits from the user balance and
/// only shrinks by withdrawals back to the balance or conversion into an
/// expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: NaiveDate,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    pub reminder: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        target_amount: f64,
        target_date: NaiveDate,
        priority: GoalPriority,
        reminder: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description,
            target_amount,
            current_amount: 0.0,
            target_date,
            priority,
            status: GoalStatus::Active,
            reminder,
            active: true,
            created_at,
            updated_at: created_at,
        }
    }

    /// Whether the reserve counts toward the user's daily reserve snapshot.
    pub fn holds_reserve(&self) -> bool {
        self.active && self.status == GoalStatus::Active
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.target_date && self.current_amount < self.target_amount
    }
}
