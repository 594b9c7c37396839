//! Transactional in-memory store and durability backends.

pub mod json_backend;

use std::sync::RwLock;

use crate::core::{CoreError, CoreResult};
use crate::domain::LedgerState;

pub use json_backend::JsonStorage;

/// Abstraction over persistence backends capable of storing ledger state
/// and timestamped backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, state: &LedgerState, name: &str) -> CoreResult<()>;
    fn load(&self, name: &str) -> CoreResult<LedgerState>;
    fn list_backups(&self, name: &str) -> CoreResult<Vec<String>>;
    fn backup(&self, state: &LedgerState, name: &str, note: Option<&str>) -> CoreResult<()>;
    fn restore(&self, name: &str, backup_name: &str) -> CoreResult<LedgerState>;
}

/// In-memory store providing the atomic unit of work every multi-entity
/// mutation runs in.
///
/// `atomically` stages a clone of the state, applies the closure to the
/// staged copy, and swaps it in only on success, so a failing step rolls
/// back every mutation of the unit. The swap boundary is also the
/// cancellation-safe checkpoint for background sweeps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<LedgerState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LedgerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Runs a read-only query against the current state.
    pub fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Runs `f` against a staged copy of the state and commits the copy
    /// only when `f` succeeds. Any `Err` leaves the store untouched.
    pub fn atomically<T>(
        &self,
        f: impl FnOnce(&mut LedgerState) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut staged = guard.clone();
        match f(&mut staged) {
            Ok(value) => {
                *guard = staged;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }

    /// Clones the current state, e.g. for persistence or inspection.
    pub fn snapshot(&self) -> LedgerState {
        self.read(|state| state.clone())
    }

    /// Replaces the whole state, e.g. after loading from a backend.
    pub fn replace(&self, state: LedgerState) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = state;
    }

    /// Persists the current state through a storage backend.
    pub fn persist(&self, backend: &dyn StorageBackend, name: &str) -> CoreResult<()> {
        backend.save(&self.snapshot(), name)
    }

    /// Loads a named state from a storage backend into a fresh store.
    pub fn load_from(backend: &dyn StorageBackend, name: &str) -> CoreResult<Self> {
        Ok(Self::with_state(backend.load(name)?))
    }
}
