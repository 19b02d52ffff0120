//! Bounded top-K collectors
//!
//! [`TopSet`] keeps the K largest `(size, path)` records seen so far; the
//! per-directory report trees use it directly (single-threaded, report
//! phase only). [`LargestFiles`] wraps one in a mutex for the global
//! largest-file collector that every scan task feeds, with an atomic
//! watermark fast path: once the set is full, any offer at or below the
//! current minimum returns without touching the lock. Under steady state
//! that is the overwhelmingly common case, so the mutex sees only the
//! offers that can actually change the result.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};

/// A sizeable path. Ordered by size, then path, so equal sizes still
/// compare deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PathSize {
    pub size: i64,
    pub path: String,
}

/// Ordered set of at most `limit` elements; inserting past the limit
/// evicts the smallest.
#[derive(Debug)]
pub struct TopSet {
    limit: usize,
    set: BTreeSet<PathSize>,
}

impl TopSet {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            set: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, size: i64, path: &str) {
        if self.limit == 0 {
            return;
        }
        self.set.insert(PathSize {
            size,
            path: path.to_string(),
        });
        if self.set.len() > self.limit {
            self.set.pop_first();
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.set.len() >= self.limit
    }

    /// Smallest retained element, if any.
    pub fn min(&self) -> Option<&PathSize> {
        self.set.first()
    }

    /// Elements from largest to smallest.
    pub fn iter_desc(&self) -> impl Iterator<Item = &PathSize> {
        self.set.iter().rev()
    }
}

/// Thread-safe largest-file collector: mutex-guarded [`TopSet`] behind a
/// rising atomic watermark.
///
/// The watermark is an under-approximation of the set's minimum - it only
/// rises, and only after the set is full. A stale read can cause an extra
/// lock acquisition, never a wrong rejection.
#[derive(Debug)]
pub struct LargestFiles {
    watermark: AtomicI64,
    inner: Mutex<TopSet>,
}

impl LargestFiles {
    pub fn new(limit: usize) -> Self {
        // A zero limit keeps nothing; park the watermark at MAX so the
        // fast path rejects everything.
        let initial = if limit == 0 { i64::MAX } else { -1 };
        Self {
            watermark: AtomicI64::new(initial),
            inner: Mutex::new(TopSet::new(limit)),
        }
    }

    /// Offer one file. Lock-free rejection below the watermark;
    /// double-checked insert above it.
    pub fn offer(&self, size: i64, path: &str) {
        if size <= self.watermark.load(Ordering::Acquire) {
            return;
        }

        let mut set = self.inner.lock();
        // Re-check under the lock; the watermark may have risen since.
        if size <= self.watermark.load(Ordering::Acquire) {
            return;
        }
        set.insert(size, path);
        if set.is_full() {
            if let Some(min) = set.min() {
                self.watermark.store(min.size, Ordering::Release);
            }
        }
    }

    /// Current watermark (test and diagnostics hook).
    pub fn watermark(&self) -> i64 {
        self.watermark.load(Ordering::Acquire)
    }

    /// Consume the collector, returning the underlying set. Called after
    /// the quiescence barrier, when no worker can still be offering.
    pub fn into_inner(self) -> TopSet {
        self.inner.into_inner()
    }
}
