//! Shared store handle
//!
//! The store is shared between the fetch workflow and whoever renders it.
//! All access goes through `read` / `update`, each of which holds the lock
//! for one synchronous closure. The lock is never held across an `await`.

use std::sync::{Arc, PoisonError, RwLock};

use super::dashboard::{DashboardSnapshot, MetricsStore};

/// Cloneable handle to a shared `MetricsStore`
#[derive(Debug, Clone, Default)]
pub struct StoreHandle {
    inner: Arc<RwLock<MetricsStore>>,
}

impl StoreHandle {
    pub fn new(store: MetricsStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` against the current state
    pub fn read<R>(&self, f: impl FnOnce(&MetricsStore) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Run `f` as one update; other readers see all of it or none of it
    pub fn update<R>(&self, f: impl FnOnce(&mut MetricsStore) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.read(MetricsStore::snapshot)
    }

    pub fn set_start_date(&self, date: impl Into<String>) {
        let date = date.into();
        self.update(|store| store.set_start_date(date));
    }

    pub fn set_end_date(&self, date: impl Into<String>) {
        let date = date.into();
        self.update(|store| store.set_end_date(date));
    }

    pub fn is_loading(&self) -> bool {
        self.read(MetricsStore::is_loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let handle = StoreHandle::new(MetricsStore::new("2024-01-01", "2024-01-31"));
        let other = handle.clone();

        other.set_start_date("2024-01-15");
        other.update(|store| store.begin_fetch());

        assert_eq!(handle.read(|s| s.start_date().to_string()), "2024-01-15");
        assert!(handle.is_loading());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let handle = StoreHandle::new(MetricsStore::new("2024-01-01", "2024-01-31"));
        let poisoner = handle.clone();

        let _ = std::thread::spawn(move || {
            poisoner.update(|_| panic!("writer panicked"));
        })
        .join();

        handle.set_end_date("2024-02-01");
        assert_eq!(handle.snapshot().end_date, "2024-02-01");
    }
}
