//! Configuration types for duscan
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The report-selector letters and the ticker-interval format

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Directories skipped near the root by default. Pseudo-filesystems whose
/// contents are not real disk usage.
const DEFAULT_FILTER_PATHS: &[&str] = &["/proc", "/dev", "/sys"];

/// Parallel disk-usage analyzer with top-K reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "duscan",
    version,
    about = "Parallel disk-usage analyzer with top-K reports",
    long_about = "Walks a directory tree with a bounded worker pool, accumulating size,\n\
                  count, age, and ownership statistics per directory, then prints ranked\n\
                  top-K reports or a full per-directory CSV dump.\n\n\
                  Reports go to stdout; progress ticks and diagnostics go to stderr.",
    after_help = "EXAMPLES:\n    \
        duscan -d /data\n    \
        duscan -d /data -t 32 -l 20 -i 0\n    \
        duscan -d /data -R lr -F\n    \
        duscan -d /data -D -F > data.csv"
)]
pub struct CliArgs {
    /// Root directory to scan
    #[arg(short = 'd', long = "dir", default_value = ".", value_name = "PATH")]
    pub root: PathBuf,

    /// Ticker interval (e.g. "1s", "500ms"); "0" disables the ticker
    #[arg(short = 'i', long = "interval", default_value = "1s", value_name = "DUR")]
    pub interval: String,

    /// Dump the full per-directory CSV instead of the top-K reports
    #[arg(short = 'D', long = "dump")]
    pub dump: bool,

    /// Flat units: raw integers and fractional days instead of humanized
    #[arg(short = 'F', long = "flat")]
    pub flat: bool,

    /// Reports to emit: l largest files, i dirs by immediate file size,
    /// f dirs by immediate file count, d dirs by immediate dir count,
    /// r dirs by recursive size, u totals by owner UID
    #[arg(
        short = 'R',
        long = "reports",
        default_value = "lifdru",
        value_name = "LETTERS"
    )]
    pub reports: String,

    /// Worker-pool capacity (live parallel scan tasks)
    #[arg(short = 't', long = "threads", default_value_t = num_cpus::get(), value_name = "NUM")]
    pub workers: usize,

    /// Limit the top-K reports to the N largest entries
    #[arg(short = 'l', long = "limit", default_value = "10", value_name = "NUM")]
    pub limit: usize,

    /// Write per-entry error diagnostics during the scan
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// One top-K report section, in the order requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// `l` - largest files globally
    LargestFiles,
    /// `i` - directories by total file size immediately in them
    DirsByImmSize,
    /// `f` - directories by file count immediately in them
    DirsByImmFiles,
    /// `d` - directories by directory count immediately in them
    DirsByImmDirs,
    /// `r` - directories by total file size recursively in them
    DirsByRecSize,
    /// `u` - total usage by owner UID (Unix-like only)
    ByOwner,
}

impl ReportKind {
    fn from_letter(letter: char) -> Result<Self, ConfigError> {
        match letter {
            'l' => Ok(Self::LargestFiles),
            'i' => Ok(Self::DirsByImmSize),
            'f' => Ok(Self::DirsByImmFiles),
            'd' => Ok(Self::DirsByImmDirs),
            'r' => Ok(Self::DirsByRecSize),
            'u' => Ok(Self::ByOwner),
            other => Err(ConfigError::UnknownReport { letter: other }),
        }
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan. `main` resolves this to an absolute path
    /// before the scan starts.
    pub root: PathBuf,

    /// Ticker interval; `Duration::ZERO` disables the ticker
    pub tick_interval: Duration,

    /// Emit the full CSV dump instead of the report sections
    pub dump_csv: bool,

    /// Raw integers and fractional days instead of humanized units
    pub flat_units: bool,

    /// Report sections, in requested order
    pub reports: Vec<ReportKind>,

    /// Worker-pool capacity
    pub worker_count: usize,

    /// Top-K parameter for every report
    pub top_limit: usize,

    /// Per-entry error diagnostics enabled
    pub verbose: bool,

    /// Paths skipped when encountered at depth <= 1
    pub filter_paths: Vec<PathBuf>,
}

impl ScanConfig {
    /// Configuration with defaults for everything but the root. Used by
    /// tests and embedders; the CLI goes through [`ScanConfig::from_args`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tick_interval: Duration::ZERO,
            dump_csv: false,
            flat_units: false,
            reports: Vec::new(),
            worker_count: num_cpus::get(),
            top_limit: 10,
            verbose: false,
            filter_paths: DEFAULT_FILTER_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        if args.limit == 0 {
            return Err(ConfigError::InvalidLimit { limit: args.limit });
        }

        let reports = args
            .reports
            .chars()
            .map(ReportKind::from_letter)
            .collect::<Result<Vec<_>, _>>()?;

        let tick_interval = parse_interval(&args.interval)?;

        Ok(Self {
            root: args.root,
            tick_interval,
            dump_csv: args.dump,
            flat_units: args.flat,
            reports,
            worker_count: args.workers,
            top_limit: args.limit,
            verbose: args.verbose,
            filter_paths: DEFAULT_FILTER_PATHS.iter().map(PathBuf::from).collect(),
        })
    }
}

/// Parse a ticker interval: a number with an optional `ms`, `s`, `m`, or
/// `h` suffix. A bare number means seconds; `0` disables the ticker.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: "empty string".into(),
        });
    }

    let (digits, unit_ms) = if let Some(v) = value.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = value.strip_suffix('s') {
        (v, 1_000.0)
    } else if let Some(v) = value.strip_suffix('m') {
        (v, 60_000.0)
    } else if let Some(v) = value.strip_suffix('h') {
        (v, 3_600_000.0)
    } else {
        (value, 1_000.0)
    };

    let number: f64 = digits.parse().map_err(|_| ConfigError::InvalidInterval {
        value: value.to_string(),
        reason: format!("'{digits}' is not a number"),
    })?;

    if !number.is_finite() || number < 0.0 {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: "must be a non-negative finite number".into(),
        });
    }

    Ok(Duration::from_millis((number * unit_ms) as u64))
}
