use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Point-in-time capture of a user's balance and goal reserves, one per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub balance: f64,
    /// Sum of active goals' current amounts on `date`.
    pub reserved: f64,
    pub created_at: DateTime<Utc>,
}

impl DailySnapshot {
    pub fn new(
        user_id: Uuid,
        date: NaiveDate,
        balance: f64,
        reserved: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            balance,
            reserved,
            created_at,
        }
    }
}
