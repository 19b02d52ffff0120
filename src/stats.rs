//! Shared atomic counters for the scan
//!
//! Every worker increments these lock-free while the walk runs; the ticker
//! samples them once per interval and the final report reads them after the
//! quiescence barrier. Entry-level errors are *only* visible here - the
//! traversal never propagates them (completeness over strictness).
//!
//! The registry is plain data owned by the scan context, not process-wide
//! statics, so concurrent scans (and concurrent tests) never share state.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// How a counter's value is rendered by the ticker and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Monotonic byte total; rendered humanized with a rate
    Bytes,
    /// Monotonic event count; rendered comma-grouped with a rate
    Count,
    /// Signed instantaneous level (live workers); rendered without a rate
    Gauge,
}

/// One named counter. Monotonic for `Bytes`/`Count`; `Gauge` may go down.
#[derive(Debug)]
pub struct Stat {
    name: &'static str,
    kind: StatKind,
    value: AtomicI64,
    prev: AtomicI64,
}

/// A point-in-time reading of one counter, with the increment since the
/// previous reading.
#[derive(Debug, Clone, Copy)]
pub struct StatSample {
    pub name: &'static str,
    pub kind: StatKind,
    pub delta: i64,
    pub value: i64,
}

impl Stat {
    pub const fn new(name: &'static str, kind: StatKind) -> Self {
        Self {
            name,
            kind,
            value: AtomicI64::new(0),
            prev: AtomicI64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn add(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Current value plus the delta since the previous `sample` call.
    /// Only the ticker calls this, so one sampling cursor suffices.
    pub fn sample(&self) -> StatSample {
        let value = self.value.load(Ordering::Relaxed);
        let prev = self.prev.swap(value, Ordering::Relaxed);
        StatSample {
            name: self.name,
            kind: self.kind,
            delta: value - prev,
            value,
        }
    }
}

/// Counters for directory-entry kinds that are neither files nor
/// directories. Counted, never followed.
#[derive(Debug, Default)]
pub struct KindCounts {
    pub symlinks: AtomicU64,
    pub fifos: AtomicU64,
    pub sockets: AtomicU64,
    pub block_devices: AtomicU64,
    pub char_devices: AtomicU64,
}

/// A non-file, non-directory entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Symlink,
    Fifo,
    Socket,
    BlockDevice,
    CharDevice,
}

impl OtherKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Symlink => "symlink",
            Self::Fifo => "pipe",
            Self::Socket => "socket",
            Self::BlockDevice => "device",
            Self::CharDevice => "char-device",
        }
    }
}

impl KindCounts {
    pub fn record(&self, kind: OtherKind) {
        let counter = match kind {
            OtherKind::Symlink => &self.symlinks,
            OtherKind::Fifo => &self.fifos,
            OtherKind::Socket => &self.sockets,
            OtherKind::BlockDevice => &self.block_devices,
            OtherKind::CharDevice => &self.char_devices,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Non-zero kinds as `(label, count)` pairs for the error summary.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        [
            (OtherKind::Symlink, &self.symlinks),
            (OtherKind::Fifo, &self.fifos),
            (OtherKind::Socket, &self.sockets),
            (OtherKind::BlockDevice, &self.block_devices),
            (OtherKind::CharDevice, &self.char_devices),
        ]
        .into_iter()
        .map(|(kind, counter)| (kind.label(), counter.load(Ordering::Relaxed)))
        .filter(|&(_, count)| count > 0)
        .collect()
    }
}

/// The full registry shared by workers, ticker, and reports.
#[derive(Debug)]
pub struct ScanStats {
    /// Sum of file sizes seen
    pub total_size: Stat,
    /// Regular (and irregular) files seen
    pub count_files: Stat,
    /// Subdirectories discovered
    pub count_dirs: Stat,
    /// Live spawned scan tasks
    pub workers: Stat,
    /// Entries whose stat failed; the entry is skipped
    pub filestat_errors: Stat,
    /// Directories that could not be listed; they become zero-stat leaves
    pub dir_list_errors: Stat,
    /// Directories rejected by the shallow path filter
    pub filter_dirs: Stat,
    /// Entries that are neither files nor directories
    pub not_dir_or_file: Stat,
    /// Per-kind breakdown of `not_dir_or_file`
    pub kinds: KindCounts,
}

impl ScanStats {
    pub fn new() -> Self {
        Self {
            total_size: Stat::new("bytes", StatKind::Bytes),
            count_files: Stat::new("files", StatKind::Count),
            count_dirs: Stat::new("dirs", StatKind::Count),
            workers: Stat::new("workers", StatKind::Gauge),
            filestat_errors: Stat::new("filestat-errors", StatKind::Count),
            dir_list_errors: Stat::new("dirlist-errors", StatKind::Count),
            filter_dirs: Stat::new("filtered-dirs", StatKind::Count),
            not_dir_or_file: Stat::new("other-entries", StatKind::Count),
            kinds: KindCounts::default(),
        }
    }

    /// The counters the periodic ticker samples, in print order.
    pub fn ticker_stats(&self) -> [&Stat; 4] {
        [
            &self.total_size,
            &self.count_files,
            &self.count_dirs,
            &self.workers,
        ]
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_add_and_get() {
        let stat = Stat::new("bytes", StatKind::Bytes);
        stat.add(100);
        stat.add(28);
        assert_eq!(stat.get(), 128);
    }

    #[test]
    fn test_gauge_goes_down() {
        let gauge = Stat::new("workers", StatKind::Gauge);
        gauge.add(3);
        gauge.add(-2);
        assert_eq!(gauge.get(), 1);
    }

    #[test]
    fn test_sample_deltas_sum_to_total() {
        let stat = Stat::new("files", StatKind::Count);
        let mut deltas = 0;

        stat.add(10);
        let s = stat.sample();
        assert_eq!(s.delta, 10);
        deltas += s.delta;

        let s = stat.sample();
        assert_eq!(s.delta, 0);
        deltas += s.delta;

        stat.add(5);
        stat.add(7);
        let s = stat.sample();
        assert_eq!(s.delta, 12);
        deltas += s.delta;

        assert_eq!(deltas, stat.get());
    }

    #[test]
    fn test_monotonic_sample_deltas_nonnegative() {
        let stat = Stat::new("dirs", StatKind::Count);
        for i in 0..10 {
            stat.add(i);
            assert!(stat.sample().delta >= 0);
        }
    }

    #[test]
    fn test_kind_counts_snapshot_skips_zero() {
        let kinds = KindCounts::default();
        kinds.record(OtherKind::Symlink);
        kinds.record(OtherKind::Symlink);
        kinds.record(OtherKind::Socket);

        let snap = kinds.snapshot();
        assert_eq!(snap, vec![("symlink", 2), ("socket", 1)]);
    }

    #[test]
    fn test_ticker_stats_order() {
        let stats = ScanStats::new();
        let names: Vec<_> = stats.ticker_stats().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["bytes", "files", "dirs", "workers"]);
    }
}
