//! Report building and rendering
//!
//! After the roll-up, one pre-order walk feeds every directory into the
//! four per-directory top-K trees (sequential - the parallel phase is
//! over). Rendering then descends each requested tree from largest to
//! smallest, one line per entry, humanized or flat per the configuration.

use crate::config::{ReportKind, ScanConfig};
use crate::fmt::{bytes_str, comma_separated, count_str};
use crate::platform;
use crate::stats::ScanStats;
use crate::topk::TopSet;
use crate::tree::DirNode;
use crate::users::UserTable;
use crate::walker::ScanOutcome;
use console::style;
use std::io::{self, Write};
use std::time::Duration;

/// The per-directory top-K trees, populated in the report phase.
pub struct DirTops {
    pub by_imm_size: TopSet,
    pub by_imm_files: TopSet,
    pub by_imm_dirs: TopSet,
    pub by_rec_size: TopSet,
}

/// Pre-order walk feeding every node into the four rankings.
pub fn collect_dir_tops(root: &DirNode, limit: usize) -> DirTops {
    let mut tops = DirTops {
        by_imm_size: TopSet::new(limit),
        by_imm_files: TopSet::new(limit),
        by_imm_dirs: TopSet::new(limit),
        by_rec_size: TopSet::new(limit),
    };
    feed(&mut tops, root);
    tops
}

fn feed(tops: &mut DirTops, node: &DirNode) {
    tops.by_imm_size.insert(node.imm_size as i64, &node.name);
    tops.by_imm_files.insert(node.imm_files as i64, &node.name);
    tops.by_imm_dirs.insert(node.imm_dirs as i64, &node.name);
    tops.by_rec_size.insert(node.rec_size as i64, &node.name);
    for child in &node.children {
        feed(tops, child);
    }
}

/// Render the requested report sections in order.
pub fn print_reports(config: &ScanConfig, outcome: &ScanOutcome, tops: &DirTops) {
    let flat = config.flat_units;
    for (i, kind) in config.reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match kind {
            ReportKind::LargestFiles => {
                print_top_set("Largest files (globally)", &outcome.largest_files, true, flat)
            }
            ReportKind::DirsByImmSize => print_top_set(
                "Directories by immediate file size",
                &tops.by_imm_size,
                true,
                flat,
            ),
            ReportKind::DirsByImmFiles => print_top_set(
                "Directories by immediate file count",
                &tops.by_imm_files,
                false,
                flat,
            ),
            ReportKind::DirsByImmDirs => print_top_set(
                "Directories by immediate directory count",
                &tops.by_imm_dirs,
                false,
                flat,
            ),
            ReportKind::DirsByRecSize => print_top_set(
                "Directories by recursive file size",
                &tops.by_rec_size,
                true,
                flat,
            ),
            ReportKind::ByOwner => print_owner_report(&outcome.users, config.top_limit, flat),
        }
    }
}

/// One section: title, then entries descending.
fn print_top_set(title: &str, set: &TopSet, bytes: bool, flat: bool) {
    println!("{title}");
    for entry in set.iter_desc() {
        let value = entry.size.max(0) as u64;
        let rendered = if bytes {
            bytes_str(value, flat)
        } else {
            count_str(value, flat)
        };
        println!("{rendered:>12} {}", entry.path);
    }
}

fn print_owner_report(users: &UserTable, limit: usize, flat: bool) {
    if !platform::OWNER_LOOKUP_SUPPORTED {
        println!("Owner totals are not supported on this platform");
        return;
    }
    println!(
        "{:>8} {:>12} {:>12} {:>12}   uniq owners: {}, owner switches: {}",
        "UID",
        "Space",
        "Files",
        "Dirs",
        users.len(),
        users.switch_count(),
    );
    for user in users.snapshot_sorted().into_iter().take(limit) {
        println!(
            "{:>8} {:>12} {:>12} {:>12}",
            user.uid,
            bytes_str(user.size, flat),
            count_str(user.files, flat),
            count_str(user.dirs, flat),
        );
    }
}

/// Non-zero error counters, one line each. Silence means a clean walk.
pub fn print_scan_errors<W: Write>(stats: &ScanStats, out: &mut W) -> io::Result<()> {
    let filestat = stats.filestat_errors.get();
    if filestat > 0 {
        writeln!(out, "{filestat:>8} file stat errors")?;
    }

    let kinds = stats.kinds.snapshot();
    if !kinds.is_empty() {
        let rendered: Vec<String> = kinds
            .iter()
            .map(|(label, count)| format!("{label}={count}"))
            .collect();
        writeln!(out, "skipped entry kinds: {}", rendered.join(", "))?;
    }

    let filtered = stats.filter_dirs.get();
    if filtered > 0 {
        writeln!(out, "{filtered:>8} special directories filtered")?;
    }

    let dirlist = stats.dir_list_errors.get();
    if dirlist > 0 {
        writeln!(out, "{dirlist:>8} directories that could not be listed")?;
    }
    Ok(())
}

/// Styled grand-total block, printed after the report sections.
pub fn print_summary(stats: &ScanStats, duration: Duration) {
    let files = stats.count_files.get().max(0) as u64;
    let dirs = stats.count_dirs.get().max(0) as u64;
    let bytes = stats.total_size.get().max(0) as u64;
    let secs = duration.as_secs_f64();
    let rate = if secs > 0.0 { files as f64 / secs } else { 0.0 };

    println!();
    println!("{}", style("Scan Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Directories:").bold(),
        comma_separated(dirs)
    );
    println!("  {} {}", style("Files:").bold(), comma_separated(files));
    println!("  {} {}", style("Total Size:").bold(), bytes_str(bytes, false));
    println!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        secs,
        rate
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DirNode {
        // root: 100B file; d1: 75B over two files + d2; d2: 1000B file
        let mut root = DirNode::new("/r".into());
        root.record_file(100, 10);
        let mut d1 = DirNode::new("/r/d1".into());
        d1.record_file(50, 20);
        d1.record_file(25, 30);
        let mut d2 = DirNode::new("/r/d1/d2".into());
        d2.record_file(1000, 40);
        d1.record_subdir();
        d1.children.push(d2);
        root.record_subdir();
        root.children.push(d1);
        crate::tree::rollup(&mut root);
        root
    }

    #[test]
    fn test_collect_dir_tops_rankings() {
        let root = sample_tree();
        let tops = collect_dir_tops(&root, 10);

        let imm: Vec<(i64, &str)> = tops
            .by_imm_size
            .iter_desc()
            .map(|e| (e.size, e.path.as_str()))
            .collect();
        assert_eq!(imm[0], (1000, "/r/d1/d2"));
        assert_eq!(imm[1], (100, "/r"));
        assert_eq!(imm[2], (75, "/r/d1"));

        let rec: Vec<(i64, &str)> = tops
            .by_rec_size
            .iter_desc()
            .map(|e| (e.size, e.path.as_str()))
            .collect();
        assert_eq!(rec[0], (1175, "/r"));
        assert_eq!(rec[1], (1075, "/r/d1"));
        assert_eq!(rec[2], (1000, "/r/d1/d2"));
    }

    #[test]
    fn test_collect_dir_tops_respects_limit() {
        let root = sample_tree();
        let tops = collect_dir_tops(&root, 2);
        assert_eq!(tops.by_imm_size.len(), 2);
        assert_eq!(tops.by_rec_size.len(), 2);
    }

    #[test]
    fn test_dir_count_ranking() {
        let root = sample_tree();
        let tops = collect_dir_tops(&root, 10);
        let top = tops.by_imm_dirs.iter_desc().next().unwrap();
        assert_eq!(top.size, 1);
    }
}
