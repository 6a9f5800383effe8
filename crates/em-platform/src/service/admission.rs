//! Per-event admission locks
//!
//! Anything that reads the confirmed count of an event and writes based on
//! it, or removes the event's registrations, holds the event's lock. Entries
//! are removed from the map as soon as nobody holds or waits for them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct AdmissionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl AdmissionLocks {
    /// Wait for exclusive access to `event_id`
    pub async fn acquire(&self, event_id: &str) -> AdmissionGuard {
        let lock = self.locks.entry(event_id.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        AdmissionGuard {
            locks: self.clone(),
            event_id: event_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of events with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock for one event. Unlocks and prunes the map entry on drop, also
/// when the owning future is cancelled.
pub struct AdmissionGuard {
    locks: AdmissionLocks,
    event_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.event_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
