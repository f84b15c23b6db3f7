//! Single-value snapshot slot backing one feed.
//!
//! # Design Decisions
//! - `ArcSwapOption` gives lock-free reads and wholesale replacement
//! - Readers hold an `Arc` to the snapshot they loaded; a concurrent
//!   publish never mutates it
//! - Refresh metadata travels inside the snapshot so value and timestamp
//!   are always consistent

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A published value with the time it was fetched.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub value: T,
    pub refreshed_at: SystemTime,
}

impl<T> Snapshot<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            refreshed_at: SystemTime::now(),
        }
    }

    /// Seconds since the epoch at which the value was published.
    pub fn refreshed_at_unix(&self) -> u64 {
        self.refreshed_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Holds the latest successfully fetched value of one feed.
#[derive(Debug)]
pub struct FeedSlot<T> {
    current: ArcSwapOption<Snapshot<T>>,
    consecutive_failures: AtomicU64,
}

impl<T> Default for FeedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FeedSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            consecutive_failures: AtomicU64::new(0),
        }
    }

    /// Latest published snapshot, if any.
    pub fn load(&self) -> Option<Arc<Snapshot<T>>> {
        self.current.load_full()
    }

    /// Replace the value wholesale, returning the previous snapshot.
    pub fn publish(&self, value: T) -> Option<Arc<Snapshot<T>>> {
        self.consecutive_failures.store(0, Ordering::Release);
        self.current.swap(Some(Arc::new(Snapshot::new(value))))
    }

    /// Publish only if nothing has been published yet.
    ///
    /// Returns whether the value was stored.
    pub fn publish_if_empty(&self, value: T) -> bool {
        let fresh = Some(Arc::new(Snapshot::new(value)));
        let previous = self.current.compare_and_swap(&None::<Arc<Snapshot<T>>>, fresh);
        let stored = previous.is_none();
        if stored {
            self.consecutive_failures.store(0, Ordering::Release);
        }
        stored
    }

    /// Count a failed refresh; the published value is left untouched.
    pub fn record_failure(&self) -> u64 {
        self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Failed refreshes since the last successful publish.
    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures.load(Ordering::Acquire)
    }
}
