use thiserror::Error;
use uuid::Uuid;

use crate::domain::Category;

/// Unified error type for the engine's services and storage.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Recurring transaction not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Budget period overlaps an existing {0} budget")]
    BudgetOverlap(Category),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}
