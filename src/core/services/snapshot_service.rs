//! Daily point-in-time captures of balance and goal reserves.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::Clock;
use crate::domain::DailySnapshot;
use crate::store::MemoryStore;

pub struct SnapshotService;

impl SnapshotService {
    /// Captures one snapshot per user for the clock's current date.
    ///
    /// Users already captured today are skipped, so re-running the sweep on
    /// the same day records nothing new. Returns the number of snapshots
    /// written.
    pub fn record_daily(store: &MemoryStore, clock: &dyn Clock) -> usize {
        let now = clock.now();
        let today = clock.today();
        let written = store
            .atomically(|state| {
                let mut created = 0usize;
                let user_ids: Vec<Uuid> = state.users.iter().map(|u| u.id).collect();
                for user_id in user_ids {
                    let exists = state
                        .snapshots
                        .iter()
                        .any(|s| s.user_id == user_id && s.date == today);
                    if exists {
                        debug!(user_id = %user_id, %today, "snapshot already recorded");
                        continue;
                    }
                    let balance = state.user(user_id).map(|u| u.balance).unwrap_or(0.0);
                    let reserved: f64 = state
                        .goals_for(user_id)
                        .filter(|g| g.holds_reserve())
                        .map(|g| g.current_amount)
                        .sum();
                    state.snapshots.push(DailySnapshot::new(
                        user_id, today, balance, reserved, now,
                    ));
                    created += 1;
                }
                Ok(created)
            })
            .unwrap_or(0);
        if written > 0 {
            info!(count = written, %today, "recorded daily snapshots");
        }
        written
    }

    /// A user's snapshots within `[from, to]`, oldest first.
    pub fn history(
        store: &MemoryStore,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<DailySnapshot> {
        store.read(|state| {
            let mut items: Vec<DailySnapshot> = state
                .snapshots
                .iter()
                .filter(|s| s.user_id == user_id && s.date >= from && s.date <= to)
                .cloned()
                .collect();
            items.sort_by_key(|s| s.date);
            items
        })
    }
}
