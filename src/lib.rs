#![doc(test(attr(deny(warnings))))]

//! FinLedger Core keeps a user's running balance, category budgets,
//! recurring-transaction templates, and savings goals mathematically
//! consistent, and drives the background sweeps that renew budget periods,
//! materialize recurring occurrences, and capture daily snapshots.

pub mod core;
pub mod domain;
pub mod scheduler;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinLedger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
