//! Per-owner usage accounting
//!
//! Updating a shared map once per file would swamp it, so each scan task
//! owns a single-slot [`UserSlot`] that accumulates for one uid at a time.
//! Adjacent files in a directory almost always share an owner, so the slot
//! flushes into the shared [`UserTable`] only on owner switches and on task
//! exit - O(uid switches) shared-map updates instead of O(files). The
//! unconditional flush on exit is a `Drop` impl, so error paths cannot
//! leak counts.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Marks an empty task-local slot. No real uid takes this value.
pub const NULL_UID: u32 = u32::MAX;

/// Accumulated usage for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub uid: u32,
    pub size: u64,
    pub files: u64,
    pub dirs: u64,
}

impl UserStats {
    fn empty(uid: u32) -> Self {
        Self {
            uid,
            size: 0,
            files: 0,
            dirs: 0,
        }
    }

    /// Files plus directories; the report's tie-breaker.
    pub fn nodes(&self) -> u64 {
        self.files + self.dirs
    }
}

/// Shared uid -> stats table with additive merge.
#[derive(Debug, Default)]
pub struct UserTable {
    map: DashMap<u32, UserStats>,
    switches: AtomicU64,
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one flushed slot. Empty slots are ignored.
    fn merge(&self, stats: UserStats) {
        if stats.uid == NULL_UID {
            return;
        }
        self.map
            .entry(stats.uid)
            .and_modify(|existing| {
                existing.size += stats.size;
                existing.files += stats.files;
                existing.dirs += stats.dirs;
            })
            .or_insert(stats);
    }

    fn record_switch(&self) {
        self.switches.fetch_add(1, Ordering::Relaxed);
    }

    /// How many times any task's slot changed owner mid-stream.
    pub fn switch_count(&self) -> u64 {
        self.switches.load(Ordering::Relaxed)
    }

    /// Number of distinct owners seen.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Snapshot sorted by size descending, ties by node count descending,
    /// then uid ascending so the order is fully deterministic.
    pub fn snapshot_sorted(&self) -> Vec<UserStats> {
        let mut list: Vec<UserStats> = self.map.iter().map(|entry| *entry.value()).collect();
        list.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then(b.nodes().cmp(&a.nodes()))
                .then(a.uid.cmp(&b.uid))
        });
        list
    }
}

/// One scan task's owner accumulator. Holds stats for a single uid;
/// a different uid flushes the slot and adopts the newcomer. Flushes
/// whatever remains when dropped.
#[derive(Debug)]
pub struct UserSlot<'a> {
    table: &'a UserTable,
    stats: UserStats,
}

impl<'a> UserSlot<'a> {
    pub fn new(table: &'a UserTable) -> Self {
        Self {
            table,
            stats: UserStats::empty(NULL_UID),
        }
    }

    pub fn add_file(&mut self, uid: u32, size: u64) {
        self.adopt(uid);
        self.stats.files += 1;
        self.stats.size += size;
    }

    pub fn add_dir(&mut self, uid: u32) {
        self.adopt(uid);
        self.stats.dirs += 1;
    }

    fn adopt(&mut self, uid: u32) {
        if self.stats.uid == uid {
            return;
        }
        if self.stats.uid != NULL_UID {
            self.table.record_switch();
            self.table.merge(self.stats);
        }
        self.stats = UserStats::empty(uid);
    }
}

impl Drop for UserSlot<'_> {
    fn drop(&mut self) {
        self.table.merge(self.stats);
    }
}
