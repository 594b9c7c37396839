//! Ledger transactions and their balance effect.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Direction of a transaction's effect on the owner's balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Signed balance effect of an amount of this kind.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// A concrete financial event in the ledger.
///
/// Identity is immutable once created; updates and deletes by the owning
/// user must re-run balance and budget reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    /// Budget this expense counted against, when one covered its date.
    #[serde(default)]
    pub budget_id: Option<Uuid>,
    /// Template that materialized this transaction, if any.
    #[serde(default)]
    pub recurring_id: Option<Uuid>,
    #[serde(default)]
    pub recurring_generated: bool,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        amount: f64,
        category: Category,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description,
            amount,
            category,
            kind,
            date,
            budget_id: None,
            recurring_id: None,
            recurring_generated: false,
        }
    }

    /// The transaction's signed effect on the owner's balance.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}
