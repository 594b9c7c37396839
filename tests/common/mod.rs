use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

use finledger::core::{Clock, ManualClock};
use finledger::domain::UserAccount;
use finledger::store::{JsonStorage, MemoryStore};

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store seeded with one user, and a manual clock pinned to `today`.
pub fn setup(balance: f64, today: NaiveDate) -> (MemoryStore, Uuid, ManualClock) {
    let clock = ManualClock::at_date(today);
    let store = MemoryStore::new();
    let user = UserAccount::new("Integration", balance, clock.now());
    let user_id = user.id;
    store
        .atomically(|state| {
            state.users.push(user.clone());
            Ok(())
        })
        .expect("seed user");
    (store, user_id, clock)
}

/// Creates an isolated JSON storage backed by a unique directory.
#[allow(dead_code)]
pub fn isolated_storage() -> JsonStorage {
    let temp = TempDir::new().expect("create temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3))
        .expect("create json storage backend");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    storage
}

#[allow(dead_code)]
pub fn balance_of(store: &MemoryStore, user_id: Uuid) -> f64 {
    store.read(|state| state.user(user_id).expect("user exists").balance)
}
