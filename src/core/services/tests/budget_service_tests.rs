use crate::core::services::{BudgetService, BudgetUpdate, NewBudget};
use crate::core::CoreError;
use crate::domain::{Category, RenewalFrequency};

use super::{date, store_with_user};

fn food_budget(start_day: u32) -> NewBudget {
    NewBudget {
        category: Category::Food,
        planned_amount: 500.0,
        start_date: date(2024, 1, start_day),
        frequency: RenewalFrequency::Monthly,
        auto_renew: false,
        reminder: false,
    }
}

#[test]
fn create_computes_end_date_and_zeroes_counters() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    let budget = BudgetService::create(&store, user_id, food_budget(1)).expect("create budget");
    assert_eq!(budget.end_date, date(2024, 2, 1));
    assert_eq!(budget.spent_amount, 0.0);
    assert_eq!(budget.renewal_count, 0);
}

#[test]
fn overlapping_same_category_period_is_rejected() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    BudgetService::create(&store, user_id, food_budget(1)).expect("first budget");

    let overlap = BudgetService::create(&store, user_id, food_budget(15));
    assert!(matches!(
        overlap,
        Err(CoreError::BudgetOverlap(Category::Food))
    ));
    assert_eq!(store.read(|s| s.budgets.len()), 1);
}

#[test]
fn adjacent_period_on_the_boundary_is_allowed() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    BudgetService::create(&store, user_id, food_budget(1)).expect("first budget");

    // [2024-01-01, 2024-02-01) and [2024-02-01, 2024-03-01) share only the
    // half-open boundary.
    let second = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            start_date: date(2024, 2, 1),
            ..food_budget(1)
        },
    );
    assert!(second.is_ok());
}

#[test]
fn different_category_may_overlap() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    BudgetService::create(&store, user_id, food_budget(1)).expect("food budget");
    let rent = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            category: Category::Rent,
            ..food_budget(1)
        },
    );
    assert!(rent.is_ok());
}

#[test]
fn update_recomputes_end_from_immutable_start() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    let budget = BudgetService::create(&store, user_id, food_budget(1)).unwrap();

    let updated = BudgetService::update(
        &store,
        user_id,
        budget.id,
        BudgetUpdate {
            planned_amount: 600.0,
            frequency: RenewalFrequency::Weekly,
            auto_renew: true,
            reminder: true,
        },
    )
    .expect("update budget");

    assert_eq!(updated.start_date, date(2024, 1, 1));
    assert_eq!(updated.end_date, date(2024, 1, 8));
    assert_eq!(updated.planned_amount, 600.0);
    assert!(updated.auto_renew);
}

#[test]
fn update_into_an_overlap_fails_and_changes_nothing() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    let weekly = BudgetService::create(
        &store,
        user_id,
        NewBudget {
            frequency: RenewalFrequency::Weekly,
            ..food_budget(1)
        },
    )
    .unwrap();
    BudgetService::create(
        &store,
        user_id,
        NewBudget {
            start_date: date(2024, 1, 8),
            frequency: RenewalFrequency::Weekly,
            ..food_budget(1)
        },
    )
    .unwrap();

    // Stretching the first period to a month would run into the second.
    let result = BudgetService::update(
        &store,
        user_id,
        weekly.id,
        BudgetUpdate {
            planned_amount: 500.0,
            frequency: RenewalFrequency::Monthly,
            auto_renew: false,
            reminder: false,
        },
    );
    assert!(matches!(result, Err(CoreError::BudgetOverlap(_))));
    let unchanged = store.read(|s| s.budget(weekly.id).unwrap().clone());
    assert_eq!(unchanged.end_date, date(2024, 1, 8));
    assert_eq!(unchanged.frequency, RenewalFrequency::Weekly);
}

#[test]
fn reverse_spend_never_goes_negative() {
    let (store, user_id, _clock) = store_with_user(0.0, date(2024, 1, 1));
    let budget = BudgetService::create(&store, user_id, food_budget(1)).unwrap();
    store
        .atomically(|state| {
            BudgetService::record_spend_in(state, budget.id, 30.0)?;
            BudgetService::reverse_spend_in(state, budget.id, 50.0)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(store.read(|s| s.budget(budget.id).unwrap().spent_amount), 0.0);
}

#[test]
fn delete_detaches_linked_transactions() {
    use crate::core::services::{NewTransaction, TransactionService};
    use crate::domain::TransactionKind;

    let (store, user_id, _clock) = store_with_user(500.0, date(2024, 1, 1));
    let budget = BudgetService::create(&store, user_id, food_budget(1)).unwrap();
    let txn = TransactionService::create(
        &store,
        user_id,
        NewTransaction {
            title: "Lunch".into(),
            description: None,
            amount: 20.0,
            category: Category::Food,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 5),
        },
    )
    .unwrap();
    assert_eq!(txn.budget_id, Some(budget.id));

    BudgetService::delete(&store, user_id, budget.id).expect("delete budget");
    let detached = store.read(|s| s.transaction(txn.id).unwrap().budget_id);
    assert_eq!(detached, None);
}
