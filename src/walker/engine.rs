//! Per-directory traversal
//!
//! [`scan_dir`] fully populates one [`DirNode`]: reads the listing,
//! classifies every entry, accumulates immediate statistics, and descends
//! into subdirectories - spawning a scoped task when the pool has a free
//! permit, recursing inline when it does not. Entry-level failures bump
//! counters and the walk moves on; nothing here returns an error.

use crate::fmt::unix_seconds;
use crate::platform;
use crate::stats::{OtherKind, Stat};
use crate::tree::DirNode;
use crate::users::UserSlot;
use crate::walker::context::ScanContext;
use std::fs::{self, FileType};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread::{Scope, ScopedJoinHandle};
use tracing::debug;

/// A child directory in listing order: either scanned inline or still
/// running on a spawned task.
enum ChildSlot<'scope> {
    Ready(DirNode),
    Spawned(ScopedJoinHandle<'scope, DirNode>),
}

/// Keeps the live-workers gauge equal to the number of spawned tasks.
struct WorkerGauge<'a> {
    gauge: &'a Stat,
}

impl<'a> WorkerGauge<'a> {
    fn new(gauge: &'a Stat) -> Self {
        gauge.add(1);
        Self { gauge }
    }
}

impl Drop for WorkerGauge<'_> {
    fn drop(&mut self) {
        self.gauge.add(-1);
    }
}

/// Scan one directory and everything below it.
///
/// The node's immediate fields and `children` are owned by this call; no
/// other task touches them until the pool drains. Spawned children are
/// joined before returning, so the finished node always carries its full
/// subtree.
pub(crate) fn scan_dir<'scope>(
    ctx: &'scope ScanContext,
    node: &mut DirNode,
    depth: usize,
    scope: &'scope Scope<'scope, '_>,
) {
    // Flushed into the shared table on every exit path below.
    let mut user = UserSlot::new(&ctx.users);

    if ctx.shutdown.load(Ordering::Relaxed) {
        return;
    }

    // Pseudo-filesystem filter, only near the root so nested user
    // directories with the same names still get scanned.
    if depth <= 1 && ctx.is_filtered(&node.name) {
        ctx.stats.filter_dirs.inc();
        debug!(path = %node.name, "skipping filtered path");
        return;
    }

    let entries = match fs::read_dir(&node.name) {
        Ok(entries) => entries,
        Err(err) => {
            ctx.stats.dir_list_errors.inc();
            debug!(path = %node.name, error = %err, "cannot list directory");
            return;
        }
    };

    let mut slots: Vec<ChildSlot<'scope>> = Vec::new();

    for entry in entries {
        if ctx.shutdown.load(Ordering::Relaxed) {
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                ctx.stats.dir_list_errors.inc();
                debug!(path = %node.name, error = %err, "listing interrupted");
                continue;
            }
        };

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                ctx.stats.filestat_errors.inc();
                debug!(path = %path.display(), error = %err, "cannot type entry");
                continue;
            }
        };

        if file_type.is_dir() {
            let child = DirNode::new(path.to_string_lossy().into_owned());
            node.record_subdir();
            ctx.stats.count_dirs.inc();

            if platform::OWNER_LOOKUP_SUPPORTED {
                match entry.metadata() {
                    Ok(md) => user.add_dir(platform::owner_uid(&md)),
                    Err(err) => {
                        debug!(path = %path.display(), error = %err, "cannot stat directory")
                    }
                }
            }

            // Work stealing by the discoverer: free permit means a new
            // task, saturated pool means we walk the child ourselves.
            match ctx.pool.try_acquire() {
                Some(permit) => {
                    let gauge = WorkerGauge::new(&ctx.stats.workers);
                    let handle = scope.spawn(move || {
                        let _permit = permit;
                        let _gauge = gauge;
                        let mut child = child;
                        scan_dir(ctx, &mut child, depth + 1, scope);
                        child
                    });
                    slots.push(ChildSlot::Spawned(handle));
                }
                None => {
                    let mut child = child;
                    scan_dir(ctx, &mut child, depth + 1, scope);
                    slots.push(ChildSlot::Ready(child));
                }
            }
        } else if let Some(kind) = special_kind(&file_type) {
            ctx.stats.not_dir_or_file.inc();
            ctx.stats.kinds.record(kind);
            debug!(path = %path.display(), kind = kind.label(), "skipping entry");
        } else {
            // Regular files, plus anything exotic enough to defeat the
            // classifier - sized entries either way.
            scan_file(ctx, node, &mut user, &path, &entry);
        }
    }

    for slot in slots {
        node.children.push(match slot {
            ChildSlot::Ready(child) => child,
            ChildSlot::Spawned(handle) => handle.join().expect("scan task panicked"),
        });
    }
}

fn scan_file(
    ctx: &ScanContext,
    node: &mut DirNode,
    user: &mut UserSlot<'_>,
    path: &Path,
    entry: &fs::DirEntry,
) {
    let metadata = match entry.metadata() {
        Ok(md) => md,
        Err(err) => {
            ctx.stats.filestat_errors.inc();
            debug!(path = %path.display(), error = %err, "cannot stat file");
            return;
        }
    };

    let size = metadata.len();
    let mtime = metadata.modified().map_or(0, unix_seconds);

    node.record_file(size, mtime);
    ctx.stats.count_files.inc();
    ctx.stats.total_size.add(size as i64);
    ctx.largest.offer(size as i64, &path.to_string_lossy());

    if platform::OWNER_LOOKUP_SUPPORTED {
        user.add_file(platform::owner_uid(&metadata), size);
    }
}

#[cfg(unix)]
fn special_kind(file_type: &FileType) -> Option<OtherKind> {
    use std::os::unix::fs::FileTypeExt;
    if file_type.is_symlink() {
        Some(OtherKind::Symlink)
    } else if file_type.is_fifo() {
        Some(OtherKind::Fifo)
    } else if file_type.is_socket() {
        Some(OtherKind::Socket)
    } else if file_type.is_block_device() {
        Some(OtherKind::BlockDevice)
    } else if file_type.is_char_device() {
        Some(OtherKind::CharDevice)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn special_kind(file_type: &FileType) -> Option<OtherKind> {
    file_type.is_symlink().then_some(OtherKind::Symlink)
}
