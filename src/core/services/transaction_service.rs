//! Transaction entry points combining row changes with balance and budget
//! reconciliation in one atomic unit.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::core::{CoreError, CoreResult};
use crate::domain::{Category, LedgerState, Transaction, TransactionKind};
use crate::store::MemoryStore;

use super::{BalanceService, BudgetService};

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct TransactionUpdate {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

pub struct TransactionService;

impl TransactionService {
    pub fn create(
        store: &MemoryStore,
        user_id: Uuid,
        input: NewTransaction,
    ) -> CoreResult<Transaction> {
        validate_fields(&input.title, input.amount)?;
        store.atomically(|state| {
            BalanceService::apply(state, user_id, input.amount, input.kind)?;

            let mut txn = Transaction::new(
                user_id,
                input.title,
                input.description,
                input.amount,
                input.category,
                input.kind,
                input.date,
            );
            link_expense_to_budget(state, &mut txn)?;
            info!(
                transaction_id = %txn.id,
                user_id = %user_id,
                kind = %txn.kind,
                amount = txn.amount,
                "transaction created"
            );
            state.transactions.push(txn.clone());
            Ok(txn)
        })
    }

    pub fn update(
        store: &MemoryStore,
        user_id: Uuid,
        transaction_id: Uuid,
        input: TransactionUpdate,
    ) -> CoreResult<Transaction> {
        validate_fields(&input.title, input.amount)?;
        store.atomically(|state| {
            let old = state
                .transaction(transaction_id)
                .filter(|t| t.user_id == user_id)
                .cloned()
                .ok_or(CoreError::TransactionNotFound(transaction_id))?;

            // One net delta: reverse the old effect, apply the new one.
            let delta = input.kind.signed(input.amount) - old.signed_amount();
            BalanceService::adjust(state, user_id, delta)?;

            if let Some(budget_id) = old.budget_id {
                BudgetService::reverse_spend_in(state, budget_id, old.amount)?;
            }
            let new_budget_id = if input.kind == TransactionKind::Expense {
                BudgetService::matching_budget(state, user_id, input.category, input.date)
            } else {
                None
            };
            if let Some(budget_id) = new_budget_id {
                BudgetService::record_spend_in(state, budget_id, input.amount)?;
            }

            let txn = state
                .transaction_mut(transaction_id)
                .ok_or(CoreError::TransactionNotFound(transaction_id))?;
            txn.title = input.title;
            txn.description = input.description;
            txn.amount = input.amount;
            txn.category = input.category;
            txn.kind = input.kind;
            txn.date = input.date;
            txn.budget_id = new_budget_id;
            info!(transaction_id = %transaction_id, user_id = %user_id, "transaction updated");
            Ok(txn.clone())
        })
    }

    pub fn delete(
        store: &MemoryStore,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> CoreResult<Transaction> {
        store.atomically(|state| {
            let position = state
                .transactions
                .iter()
                .position(|t| t.id == transaction_id && t.user_id == user_id)
                .ok_or(CoreError::TransactionNotFound(transaction_id))?;
            let txn = state.transactions.remove(position);

            BalanceService::reverse(state, user_id, txn.amount, txn.kind)?;
            if let Some(budget_id) = txn.budget_id {
                BudgetService::reverse_spend_in(state, budget_id, txn.amount)?;
            }
            info!(transaction_id = %transaction_id, user_id = %user_id, "transaction deleted");
            Ok(txn)
        })
    }

    /// All of one user's transactions, most recent date first.
    pub fn list(store: &MemoryStore, user_id: Uuid) -> Vec<Transaction> {
        store.read(|state| {
            let mut items: Vec<Transaction> =
                state.transactions_for(user_id).cloned().collect();
            items.sort_by(|a, b| b.date.cmp(&a.date));
            items
        })
    }

    pub fn get(store: &MemoryStore, user_id: Uuid, transaction_id: Uuid) -> CoreResult<Transaction> {
        store.read(|state| {
            state
                .transaction(transaction_id)
                .filter(|t| t.user_id == user_id)
                .cloned()
                .ok_or(CoreError::TransactionNotFound(transaction_id))
        })
    }
}

fn validate_fields(title: &str, amount: f64) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// Shared with the processing sweep, which materializes expenses through
/// the same budget-linking path as a direct creation.
pub(crate) fn link_expense_to_budget(
    state: &mut LedgerState,
    txn: &mut Transaction,
) -> CoreResult<()> {
    if txn.kind != TransactionKind::Expense {
        return Ok(());
    }
    if let Some(budget_id) =
        BudgetService::matching_budget(state, txn.user_id, txn.category, txn.date)
    {
        BudgetService::record_spend_in(state, budget_id, txn.amount)?;
        txn.budget_id = Some(budget_id);
    }
    Ok(())
}
