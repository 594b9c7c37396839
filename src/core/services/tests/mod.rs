mod budget_service_tests;
mod transaction_service_tests;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::{Clock, ManualClock};
use crate::domain::UserAccount;
use crate::store::MemoryStore;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store with one user and a manual clock pinned to `today`.
pub(crate) fn store_with_user(balance: f64, today: NaiveDate) -> (MemoryStore, Uuid, ManualClock) {
    let clock = ManualClock::at_date(today);
    let store = MemoryStore::new();
    let user = UserAccount::new("Tester", balance, clock.now());
    let user_id = user.id;
    store
        .atomically(|state| {
            state.users.push(user.clone());
            Ok(())
        })
        .expect("seed user");
    (store, user_id, clock)
}

pub(crate) fn balance_of(store: &MemoryStore, user_id: Uuid) -> f64 {
    store.read(|state| state.user(user_id).expect("user exists").balance)
}
