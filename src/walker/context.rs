//! Shared state for one scan
//!
//! Everything the traversal tasks touch concurrently lives here - counters,
//! the largest-file collector, the owner table, the pool, and the shutdown
//! flag - bundled into one context passed through the walk instead of
//! process-wide statics. Two scans in one process never share state, which
//! is also what lets the integration tests run concurrently.

use crate::config::ScanConfig;
use crate::stats::ScanStats;
use crate::topk::LargestFiles;
use crate::users::UserTable;
use crate::walker::pool::WorkerPool;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub struct ScanContext {
    pub stats: Arc<ScanStats>,
    pub largest: LargestFiles,
    pub users: UserTable,
    pub pool: WorkerPool,
    pub shutdown: Arc<AtomicBool>,
    filter_paths: Vec<PathBuf>,
}

impl ScanContext {
    pub fn new(config: &ScanConfig, stats: Arc<ScanStats>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            stats,
            largest: LargestFiles::new(config.top_limit),
            users: UserTable::new(),
            pool: WorkerPool::new(config.worker_count),
            shutdown,
            filter_paths: config.filter_paths.clone(),
        }
    }

    /// Whether a path is in the shallow filter set.
    pub fn is_filtered(&self, name: &str) -> bool {
        let path = Path::new(name);
        self.filter_paths.iter().any(|filtered| filtered == path)
    }
}
