use crate::core::services::{
    BudgetService, NewBudget, NewTransaction, TransactionService, TransactionUpdate,
};
use crate::core::CoreError;
use crate::domain::{Category, RenewalFrequency, TransactionKind};

use super::{balance_of, date, store_with_user};

fn expense(amount: f64, category: Category, day: u32) -> NewTransaction {
    NewTransaction {
        title: "Purchase".into(),
        description: None,
        amount,
        category,
        kind: TransactionKind::Expense,
        date: date(2024, 1, day),
    }
}

#[test]
fn create_income_raises_balance() {
    let (store, user_id, _clock) = store_with_user(100.0, date(2024, 1, 1));
    let input = NewTransaction {
        title: "Salary".into(),
        description: None,
        amount: 1500.0,
        category: Category::Miscellaneous,
        kind: TransactionKind::Income,
        date: date(2024, 1, 5),
    };
    TransactionService::create(&store, user_id, input).expect("create income");
    assert_eq!(balance_of(&store, user_id), 1600.0);
}

#[test]
fn create_expense_lowers_balance_and_links_budget() {
    let (store, user_id, _clock) = store_with_user(500.0, date(2024, 1, 1));
    let budget = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Food,
            planned_amount: 300.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    )
    .expect("create budget");

    let txn =
        TransactionService::create(&store, user_id, expense(80.0, Category::Food, 10))
            .expect("create expense");

    assert_eq!(balance_of(&store, user_id), 420.0);
    assert_eq!(txn.budget_id, Some(budget.id));
    let spent = store.read(|s| s.budget(budget.id).unwrap().spent_amount);
    assert_eq!(spent, 80.0);
}

#[test]
fn expense_outside_budget_period_stays_unlinked() {
    let (store, user_id, _clock) = store_with_user(500.0, date(2024, 1, 1));
    BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Food,
            planned_amount: 300.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    )
    .expect("create budget");

    // End boundary is exclusive, so the first day of the next period
    // belongs to no budget.
    let txn = TransactionService::create(
        &store,
        user_id,
        NewTransaction {
            title: "Boundary".into(),
            description: None,
            amount: 10.0,
            category: Category::Food,
            kind: TransactionKind::Expense,
            date: date(2024, 2, 1),
        },
    )
    .expect("create expense");
    assert_eq!(txn.budget_id, None);
}

#[test]
fn update_applies_one_net_delta_and_relinks() {
    let (store, user_id, _clock) = store_with_user(1000.0, date(2024, 1, 1));
    let food = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Food,
            planned_amount: 300.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    )
    .unwrap();
    let health = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Health,
            planned_amount: 200.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    )
    .unwrap();

    let txn =
        TransactionService::create(&store, user_id, expense(100.0, Category::Food, 10)).unwrap();
    assert_eq!(balance_of(&store, user_id), 900.0);

    let updated = TransactionService::update(
        &store,
        user_id,
        txn.id,
        TransactionUpdate {
            title: "Pharmacy".into(),
            description: None,
            amount: 60.0,
            category: Category::Health,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 12),
        },
    )
    .expect("update transaction");

    assert_eq!(balance_of(&store, user_id), 940.0);
    assert_eq!(updated.budget_id, Some(health.id));
    let (food_spent, health_spent) = store.read(|s| {
        (
            s.budget(food.id).unwrap().spent_amount,
            s.budget(health.id).unwrap().spent_amount,
        )
    });
    assert_eq!(food_spent, 0.0);
    assert_eq!(health_spent, 60.0);
}

#[test]
fn delete_reverses_balance_and_budget_spend() {
    let (store, user_id, _clock) = store_with_user(500.0, date(2024, 1, 1));
    let budget = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Grocery,
            planned_amount: 250.0,
            start_date: date(2024, 1, 1),
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    )
    .unwrap();
    let txn =
        TransactionService::create(&store, user_id, expense(75.0, Category::Grocery, 8)).unwrap();

    TransactionService::delete(&store, user_id, txn.id).expect("delete transaction");

    assert_eq!(balance_of(&store, user_id), 500.0);
    let spent = store.read(|s| s.budget(budget.id).unwrap().spent_amount);
    assert_eq!(spent, 0.0);
    assert!(store.read(|s| s.transactions.is_empty()));
}

#[test]
fn rejects_non_positive_amounts_and_blank_titles() {
    let (store, user_id, _clock) = store_with_user(100.0, date(2024, 1, 1));
    let bad_amount = TransactionService::create(
        &store,
        user_id,
        NewTransaction {
            title: "Zero".into(),
            description: None,
            amount: 0.0,
            category: Category::Food,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 2),
        },
    );
    assert!(matches!(bad_amount, Err(CoreError::Validation(_))));

    let bad_title = TransactionService::create(
        &store,
        user_id,
        NewTransaction {
            title: "  ".into(),
            description: None,
            amount: 10.0,
            category: Category::Food,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 2),
        },
    );
    assert!(matches!(bad_title, Err(CoreError::Validation(_))));
    assert!(store.read(|s| s.transactions.is_empty()));
}

#[test]
fn ownership_mismatch_reads_as_not_found() {
    let (store, user_id, _clock) = store_with_user(100.0, date(2024, 1, 1));
    let txn =
        TransactionService::create(&store, user_id, expense(10.0, Category::Food, 3)).unwrap();
    let stranger = uuid::Uuid::new_v4();
    let result = TransactionService::delete(&store, stranger, txn.id);
    assert!(matches!(result, Err(CoreError::TransactionNotFound(_))));
}
