//! Bounded worker pool
//!
//! A counting semaphore caps how many directory scans run at once. There is
//! no task queue: a worker that discovers a subdirectory either takes a
//! permit and spawns a task for it, or - when the pool is saturated -
//! recurses into it synchronously. The non-blocking acquire means a worker
//! holding I/O resources never waits, and saturation naturally reshapes the
//! traversal into a depth-first walk.
//!
//! One permit is always held by a running task (the root scan takes its
//! permit before any work starts), so the number of held permits equals the
//! number of in-flight tasks and "all permits back" is the completion
//! signal. [`WorkerPool::wait_idle`] is that quiescence barrier: it returns
//! only once every worker has released, establishing the happens-before
//! edge between all worker writes and the post-scan reader.

use parking_lot::{Condvar, Mutex};

/// Counting semaphore sized to the configured worker limit.
#[derive(Debug)]
pub struct WorkerPool {
    capacity: usize,
    permits: Mutex<usize>,
    released: Condvar,
}

/// An acquired slot in the pool. Releasing is the drop, so every exit path
/// of a task gives its permit back.
#[derive(Debug)]
pub struct Permit<'a> {
    pool: &'a WorkerPool,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "worker pool needs at least one permit");
        Self {
            capacity,
            permits: Mutex::new(capacity),
            released: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Currently available permits.
    pub fn available(&self) -> usize {
        *self.permits.lock()
    }

    /// Blocking acquire. Only the initial unit of work uses this.
    pub fn acquire(&self) -> Permit<'_> {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.released.wait(&mut permits);
        }
        *permits -= 1;
        Permit { pool: self }
    }

    /// Non-blocking acquire: `None` means the discoverer should do the
    /// work itself.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return None;
        }
        *permits -= 1;
        Some(Permit { pool: self })
    }

    /// Quiescence barrier: block until every permit has been released.
    pub fn wait_idle(&self) {
        let mut permits = self.permits.lock();
        while *permits < self.capacity {
            self.released.wait(&mut permits);
        }
    }

    fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        debug_assert!(*permits <= self.capacity, "permit released twice");
        drop(permits);
        self.released.notify_all();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_try_acquire_respects_capacity() {
        let pool = WorkerPool::new(2);
        let a = pool.try_acquire();
        let b = pool.try_acquire();
        assert!(a.is_some());
        assert!(b.is_some());
        assert!(pool.try_acquire().is_none());

        drop(a);
        assert!(pool.try_acquire().is_some());
    }

    #[test]
    fn test_permit_released_on_drop() {
        let pool = WorkerPool::new(1);
        {
            let _permit = pool.acquire();
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_wait_idle_blocks_until_all_released() {
        let pool = WorkerPool::new(4);
        let peak = AtomicUsize::new(0);
        let live = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..16 {
                let pool = &pool;
                let peak = &peak;
                let live = &live;
                scope.spawn(move || {
                    if let Some(_permit) = pool.try_acquire() {
                        let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(5));
                        live.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });

        pool.wait_idle();
        assert_eq!(pool.available(), 4);
        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[test]
    fn test_acquire_blocks_then_succeeds() {
        let pool = WorkerPool::new(1);
        let permit = pool.acquire();

        thread::scope(|scope| {
            let pool_ref = &pool;
            let handle = scope.spawn(move || {
                // blocks until the main thread drops its permit
                let _p = pool_ref.acquire();
            });
            thread::sleep(Duration::from_millis(5));
            drop(permit);
            handle.join().unwrap();
        });

        assert_eq!(pool.available(), 1);
    }
}
