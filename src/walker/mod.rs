//! Parallel directory walker
//!
//! This module implements the bounded-parallel traversal: a counting
//! semaphore caps live scan tasks, each task fully owns the directory it
//! scans, and a saturated pool turns discovery into inline depth-first
//! recursion.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!                  │          Scanner             │
//!                  │  root permit → scan root     │
//!                  │  wait_idle() barrier         │
//!                  │  roll-up recursive totals    │
//!                  └──────────────┬───────────────┘
//!                                 │
//!        ┌────────────────────────┼────────────────────────┐
//!        │                        │                        │
//!  ┌─────▼─────┐            ┌─────▼─────┐            ┌─────▼─────┐
//!  │  Task     │            │  Task     │            │  Task     │
//!  │  readdir  │  permit →  │  readdir  │  permit →  │  readdir  │
//!  │  + stat   │   spawn    │  + stat   │   spawn    │  + stat   │
//!  └───────────┘            └───────────┘            └───────────┘
//!        │ no permit? recurse inline (work stealing by discoverer)
//! ```

pub mod context;
pub mod engine;
pub mod pool;

pub use context::ScanContext;
pub use pool::{Permit, WorkerPool};

use crate::config::ScanConfig;
use crate::stats::ScanStats;
use crate::topk::TopSet;
use crate::tree::{self, DirNode};
use crate::users::UserTable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Result of a completed scan: the populated tree plus the shared
/// collectors, ready for the report phase.
pub struct ScanOutcome {
    /// Root of the directory tree, recursive totals rolled up.
    pub root: DirNode,
    /// The K largest files seen anywhere in the tree.
    pub largest_files: TopSet,
    /// Per-owner usage totals.
    pub users: UserTable,
    /// Wall time of the parallel phase including the barrier and roll-up.
    pub duration: Duration,
    /// False when the scan was interrupted before visiting everything.
    pub completed: bool,
}

/// Parallel scanner for one root directory.
pub struct Scanner {
    config: ScanConfig,
    stats: Arc<ScanStats>,
    shutdown: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            stats: Arc::new(ScanStats::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared counters; live while the scan runs, final after it returns.
    pub fn stats(&self) -> Arc<ScanStats> {
        Arc::clone(&self.stats)
    }

    /// Flag for external cancellation (signal handlers). The traversal
    /// checks it at entry boundaries and still drains before returning.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Walk the tree, wait for quiescence, roll up recursive totals.
    pub fn run(&self) -> ScanOutcome {
        let start = Instant::now();
        info!(root = %self.config.root.display(), workers = self.config.worker_count, "starting scan");

        let ctx = ScanContext::new(
            &self.config,
            Arc::clone(&self.stats),
            Arc::clone(&self.shutdown),
        );

        let mut root = DirNode::new(self.config.root.to_string_lossy().into_owned());

        // The root task takes its permit before any work starts, so held
        // permits always equal in-flight tasks and the barrier below is
        // correct even if the root finishes instantly.
        let root_permit = ctx.pool.acquire();
        thread::scope(|scope| {
            engine::scan_dir(&ctx, &mut root, 0, scope);
        });
        drop(root_permit);

        // Quiescence barrier: every worker's writes happen-before this.
        ctx.pool.wait_idle();

        tree::rollup(&mut root);

        let completed = !self.shutdown.load(Ordering::Relaxed);
        info!(
            files = self.stats.count_files.get(),
            dirs = self.stats.count_dirs.get(),
            elapsed = ?start.elapsed(),
            completed,
            "scan finished"
        );

        ScanOutcome {
            root,
            largest_files: ctx.largest.into_inner(),
            users: ctx.users,
            duration: start.elapsed(),
            completed,
        }
    }
}
