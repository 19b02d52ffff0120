//! duscan - Parallel Disk-Usage Analyzer
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use duscan::config::{CliArgs, ScanConfig};
use duscan::dump;
use duscan::error::ScanError;
use duscan::report;
use duscan::ticker::Ticker;
use duscan::walker::Scanner;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Exit code for a root directory that cannot be resolved.
const EXIT_BAD_ROOT: u8 = 3;

/// Exit code for invalid configuration; matches clap's own error code so
/// every usage problem looks the same to callers.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    setup_logging(args.verbose);

    let mut config = match ScanConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", ScanError::from(e));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    // Resolve the scan root up front; everything downstream assumes an
    // absolute path.
    config.root = match std::path::absolute(&config.root) {
        Ok(path) => path,
        Err(e) => {
            let err = ScanError::PathResolve {
                path: config.root.clone(),
                source: e,
            };
            eprintln!("Error: {err}");
            return ExitCode::from(EXIT_BAD_ROOT);
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: ScanConfig) -> Result<()> {
    let scanner = Scanner::new(config.clone());
    let stats = scanner.stats();

    setup_interrupt_handler(&scanner)?;

    let ticker = if config.tick_interval.is_zero() {
        None
    } else {
        Some(Ticker::start(
            scanner.stats(),
            config.tick_interval,
            "scanning",
        ))
    };

    let outcome = scanner.run();

    if let Some(ticker) = ticker {
        ticker.stop();
    }
    if !outcome.completed {
        eprintln!("Scan interrupted - results cover the visited portion only");
    }

    if config.dump_csv {
        // Keep stdout machine-readable: the CSV is the only thing on it.
        eprintln!("Scanned directory path: {}", config.root.display());
        dump::dump_csv(io::stdout().lock(), &outcome.root, config.flat_units)
            .context("Failed to write CSV dump")?;
        report::print_scan_errors(&stats, &mut io::stderr().lock())?;
    } else {
        println!("Scanned directory path: {}", config.root.display());

        let report_start = Instant::now();
        let tops = report::collect_dir_tops(&outcome.root, config.top_limit);
        println!("post-scan report time: {:?}", report_start.elapsed());
        println!();

        report::print_reports(&config, &outcome, &tops);
        println!();
        report::print_scan_errors(&stats, &mut io::stdout().lock())?;
        report::print_summary(&stats, outcome.duration);
    }

    io::stdout().flush().context("Failed to flush output")?;
    Ok(())
}

/// Graceful interrupt: first Ctrl+C requests shutdown (the pool still
/// drains and partial results print), a second one exits immediately.
fn setup_interrupt_handler(scanner: &Scanner) -> Result<()> {
    let shutdown_flag = scanner.shutdown_flag();
    let ctrl_c_count = Arc::new(AtomicU32::new(0));
    ctrlc::set_handler(move || {
        let count = ctrl_c_count.fetch_add(1, Ordering::SeqCst);
        if count == 0 {
            eprintln!("\nInterrupt received, draining workers...");
            eprintln!("Press Ctrl+C again to force exit immediately.");
            shutdown_flag.store(true, Ordering::SeqCst);
        } else {
            eprintln!("\nForced exit!");
            std::process::exit(130);
        }
    })
    .context("Failed to set signal handler")?;
    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("duscan=debug,warn")
    } else {
        EnvFilter::new("duscan=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
