//! duscan - Parallel Disk-Usage Analyzer
//!
//! A tool for scanning large directory trees in parallel, accumulating
//! per-directory size, count, age, and ownership statistics, and emitting
//! ranked top-K reports. Designed for administrators inspecting filesystems
//! with millions of entries where a serial traversal would be I/O-bound.
//!
//! # Features
//!
//! - **Bounded parallel traversal**: A counting semaphore caps live scan
//!   tasks; when the pool is saturated the discovering worker recurses into
//!   the subdirectory itself, so no worker ever idles while work exists.
//!
//! - **Per-directory statistics**: Every directory gets immediate (direct
//!   children only) and recursive (whole subtree) size, file count,
//!   directory count, and modification-time extrema.
//!
//! - **Top-K reports**: Largest files globally, plus directories ranked by
//!   immediate size, immediate file count, immediate directory count, and
//!   recursive size. Owner-UID totals on Unix.
//!
//! - **Live progress**: A periodic ticker samples the shared counters and
//!   prints rate/total lines to stderr while the scan runs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Scan Tasks (≤ W live)                      │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐         ┌─────────┐      │
//! │  │ Task 0  │  │ Task 1  │  │ Task 2  │  ...    │ Task N  │      │
//! │  │ readdir │  │ readdir │  │ readdir │         │ readdir │      │
//! │  └────┬────┘  └────┬────┘  └────┬────┘         └────┬────┘      │
//! │       │            │            │                   │           │
//! │       │   permit free? spawn child task : recurse inline        │
//! │       │            │            │                   │           │
//! │       ▼            ▼            ▼                   ▼           │
//! │  ┌───────────┐ ┌───────────┐ ┌──────────────┐ ┌──────────────┐  │
//! │  │ DirNode   │ │ atomic    │ │ largest-file │ │ per-task UID │  │
//! │  │ tree      │ │ counters  │ │ collector    │ │ slot → table │  │
//! │  └───────────┘ └───────────┘ └──────────────┘ └──────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                   quiescence barrier (all permits back)
//!                               │
//!                               ▼
//!              roll-up → top-K trees → reports / CSV dump
//! ```
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory with defaults
//! duscan
//!
//! # Scan /data with 32 workers, top-20 reports, no ticker
//! duscan -d /data -t 32 -l 20 -i 0
//!
//! # Full per-directory CSV in machine-friendly units
//! duscan -d /data -D -F > data.csv
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod fmt;
pub mod platform;
pub mod report;
pub mod stats;
pub mod ticker;
pub mod topk;
pub mod tree;
pub mod users;
pub mod walker;

pub use config::{CliArgs, ReportKind, ScanConfig};
pub use error::{ConfigError, Result, ScanError};
pub use walker::{ScanOutcome, Scanner};
