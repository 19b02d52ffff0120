//! Periodic progress ticker
//!
//! A background thread samples the shared counters once per interval and
//! prints one line to stderr: elapsed wall seconds, then every counter as
//! rate and absolute value (Bytes/Count) or absolute value alone (Gauge).
//! Stopping the ticker prints a final `OVERALL` line whose rates are
//! whole-run averages.
//!
//! Reports go to stdout, so the ticker writes to stderr and the two streams
//! can be split by redirection.

use crate::fmt::comma_separated;
use crate::stats::{ScanStats, StatKind, StatSample};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use humansize::{format_size, BINARY};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Handle to the running ticker thread.
pub struct Ticker {
    handle: JoinHandle<()>,
    stop_tx: Sender<()>,
    stats: Arc<ScanStats>,
    start: Instant,
    label: &'static str,
}

impl Ticker {
    /// Spawn the ticker. The caller guarantees `interval > 0`.
    pub fn start(stats: Arc<ScanStats>, interval: Duration, label: &'static str) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let start = Instant::now();

        let thread_stats = Arc::clone(&stats);
        let handle = thread::Builder::new()
            .name("duscan-ticker".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        print_tick(&thread_stats, start, interval, label);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .expect("failed to spawn ticker thread");

        Self {
            handle,
            stop_tx,
            stats,
            start,
            label,
        }
    }

    /// Stop the ticker and print the final whole-run line.
    pub fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.handle.join();
        print_overall(&self.stats, self.start, self.label);
    }
}

fn print_tick(stats: &ScanStats, start: Instant, interval: Duration, label: &'static str) {
    let elapsed = start.elapsed().as_secs_f64();
    let mut line = format!("{label} {elapsed:0.3}");
    for stat in stats.ticker_stats() {
        let sample = stat.sample();
        let rate = sample.delta as f64 / interval.as_secs_f64();
        push_sample(&mut line, &sample, rate);
    }
    eprintln!("{line}");
}

fn print_overall(stats: &ScanStats, start: Instant, label: &'static str) {
    let elapsed = start.elapsed().as_secs_f64();
    let mut line = format!("OVERALL[{label}] {elapsed:0.3}");
    for stat in stats.ticker_stats() {
        let sample = stat.sample();
        let rate = if elapsed > 0.0 {
            sample.value as f64 / elapsed
        } else {
            0.0
        };
        push_sample(&mut line, &sample, rate);
    }
    eprintln!("{line}");
}

fn push_sample(line: &mut String, sample: &StatSample, rate: f64) {
    let rendered = match sample.kind {
        StatKind::Bytes => format!(
            "  {}: {}/s, {}",
            sample.name,
            format_size(rate.max(0.0) as u64, BINARY),
            format_size(sample.value.max(0) as u64, BINARY),
        ),
        StatKind::Count => format!(
            "  {}: {}/s, {}",
            sample.name,
            comma_separated(rate.max(0.0) as u64),
            comma_separated(sample.value.max(0) as u64),
        ),
        StatKind::Gauge => format!("  {}: {}", sample.name, sample.value),
    };
    line.push_str(&rendered);
}
