//! Serialized balance mutation for every ledger operation.

use uuid::Uuid;

use crate::core::{CoreError, CoreResult};
use crate::domain::{LedgerState, TransactionKind};

/// Applies and reverses the balance effect of transactions.
///
/// Every call runs inside the caller's atomic unit, so the balance change
/// commits together with the triggering transaction/goal change or not at
/// all.
pub struct BalanceService;

impl BalanceService {
    /// Applies the effect of an amount of the given kind: income adds,
    /// expense subtracts.
    pub fn apply(
        state: &mut LedgerState,
        user_id: Uuid,
        amount: f64,
        kind: TransactionKind,
    ) -> CoreResult<()> {
        Self::adjust(state, user_id, kind.signed(amount))
    }

    /// Undoes a previously applied effect, used before deleting or
    /// replacing a transaction.
    pub fn reverse(
        state: &mut LedgerState,
        user_id: Uuid,
        amount: f64,
        kind: TransactionKind,
    ) -> CoreResult<()> {
        Self::adjust(state, user_id, -kind.signed(amount))
    }

    /// Applies one net delta, e.g. reverse-old-plus-apply-new on update.
    pub fn adjust(state: &mut LedgerState, user_id: Uuid, delta: f64) -> CoreResult<()> {
        let user = state
            .user_mut(user_id)
            .ok_or(CoreError::UserNotFound(user_id))?;
        user.balance += delta;
        Ok(())
    }

    /// Rejects balance-gated debits that would overdraw the user.
    pub fn ensure_covered(state: &LedgerState, user_id: Uuid, amount: f64) -> CoreResult<()> {
        let user = state
            .user(user_id)
            .ok_or(CoreError::UserNotFound(user_id))?;
        if user.balance < amount {
            return Err(CoreError::InsufficientFunds(format!(
                "balance {:.2} does not cover {:.2}",
                user.balance, amount
            )));
        }
        Ok(())
    }
}
