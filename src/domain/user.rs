use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record owning the running balance.
///
/// The balance equals the opening balance plus the signed effect of every
/// transaction still in effect, plus/minus goal reserve transfers. Only the
/// balance and goal services mutate it, always inside the same atomic unit
/// as the triggering change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(name: impl Into<String>, opening_balance: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: opening_balance,
            created_at,
        }
    }
}
