//! JSON storage round-trips of the full ledger state.

mod common;

use common::{date, isolated_storage, setup};
use finledger::core::services::{
    BudgetService, GoalService, NewBudget, NewGoal, NewTemplate, NewTransaction,
    RecurringService, TransactionService,
};
use finledger::domain::{Category, GoalPriority, RenewalFrequency, TransactionKind};
use finledger::store::{MemoryStore, StorageBackend};

#[test]
fn populated_state_survives_a_roundtrip() {
    let (store, user_id, clock) = setup(750.0, date(2024, 1, 1));
    BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Food,
            planned_amount: 300.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: true,
            reminder: false,
        },
    )
    .unwrap();
    TransactionService::create(
        &store,
        user_id,
        NewTransaction {
            title: "Lunch".into(),
            description: Some("Cafe".into()),
            amount: 18.0,
            category: Category::Food,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 2),
        },
    )
    .unwrap();
    RecurringService::create(
        &store,
        user_id,
        NewTemplate {
            title: "Rent".into(),
            description: None,
            amount: 900.0,
            category: Category::Rent,
            kind: TransactionKind::Expense,
            frequency: RenewalFrequency::Monthly,
            start_date: date(2024, 1, 1),
            end_date: None,
        },
        &clock,
    )
    .unwrap();
    GoalService::create(
        &store,
        user_id,
        NewGoal {
            title: "Emergency".into(),
            description: None,
            target_amount: 2000.0,
            target_date: date(2025, 1, 1),
            priority: GoalPriority::High,
            reminder: true,
        },
        &clock,
    )
    .unwrap();

    let storage = isolated_storage();
    store.persist(&storage, "household").expect("persist state");

    let reloaded = MemoryStore::load_from(&storage, "household").expect("reload state");
    reloaded.read(|state| {
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].balance, 732.0);
        assert_eq!(state.budgets.len(), 1);
        assert_eq!(state.budgets[0].spent_amount, 18.0);
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.transactions[0].budget_id, Some(state.budgets[0].id));
        assert_eq!(state.recurring.len(), 1);
        assert_eq!(state.recurring[0].next_occurrence, date(2024, 2, 1));
        assert_eq!(state.goals.len(), 1);
    });
}

#[test]
fn backups_are_listed_and_restorable() {
    let (store, _user_id, _clock) = setup(100.0, date(2024, 1, 1));
    let storage = isolated_storage();
    let state = store.snapshot();

    storage.save(&state, "family").expect("save state");
    storage
        .backup(&state, "family", Some("before migration"))
        .expect("create backup");

    let backups = storage.list_backups("family").expect("list backups");
    assert!(!backups.is_empty());

    let restored = storage
        .restore("family", &backups[0])
        .expect("restore backup");
    assert_eq!(restored.users.len(), 1);
}
