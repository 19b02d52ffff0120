//! In-memory directory tree
//!
//! One [`DirNode`] per visited directory. During the scan each node has
//! exactly one writer - the task scanning that directory - and its
//! `children` are assembled in directory-listing order. The `rec_*` fields
//! are meaningless until [`rollup`] runs after the pool has drained; only
//! then may a parent read its children.

/// "No file seen yet" sentinel for oldest-modtime fields. The first real
/// timestamp always replaces it.
pub const OLDEST_SENTINEL: i64 = i64::MAX;

/// "No file seen yet" sentinel for newest-modtime fields.
pub const NEWEST_SENTINEL: i64 = i64::MIN;

/// Statistics for one directory: immediate fields cover entries directly
/// in it, recursive fields cover the whole subtree (valid after roll-up).
#[derive(Debug)]
pub struct DirNode {
    /// Absolute path. Set at construction, never mutated.
    pub name: String,
    pub imm_size: u64,
    pub imm_files: u64,
    pub imm_dirs: u64,
    /// Oldest / newest file modtime directly in this directory, seconds
    /// since epoch.
    pub imm_old_file: i64,
    pub imm_new_file: i64,
    pub rec_size: u64,
    pub rec_files: u64,
    pub rec_dirs: u64,
    pub rec_old_file: i64,
    pub rec_new_file: i64,
    /// Subdirectories in listing order. Append-only during the scan, by
    /// the owning task.
    pub children: Vec<DirNode>,
}

impl DirNode {
    pub fn new(name: String) -> Self {
        Self {
            name,
            imm_size: 0,
            imm_files: 0,
            imm_dirs: 0,
            imm_old_file: OLDEST_SENTINEL,
            imm_new_file: NEWEST_SENTINEL,
            rec_size: 0,
            rec_files: 0,
            rec_dirs: 0,
            rec_old_file: OLDEST_SENTINEL,
            rec_new_file: NEWEST_SENTINEL,
            children: Vec::new(),
        }
    }

    /// Account one file directly in this directory.
    pub fn record_file(&mut self, size: u64, mtime: i64) {
        self.imm_size += size;
        self.rec_size += size;
        self.imm_files += 1;
        self.rec_files += 1;
        self.imm_new_file = self.imm_new_file.max(mtime);
        self.imm_old_file = self.imm_old_file.min(mtime);
        self.rec_new_file = self.rec_new_file.max(mtime);
        self.rec_old_file = self.rec_old_file.min(mtime);
    }

    /// Account one subdirectory directly in this directory.
    pub fn record_subdir(&mut self) {
        self.imm_dirs += 1;
        self.rec_dirs += 1;
    }

    /// Number of nodes in this subtree, root included.
    pub fn node_count(&self) -> u64 {
        1 + self.children.iter().map(DirNode::node_count).sum::<u64>()
    }
}

/// Post-order roll-up of recursive totals: fold every child's `rec_*`
/// fields into its parent. Single-threaded, run once after the parallel
/// phase has quiesced. O(nodes), no allocation.
pub fn rollup(node: &mut DirNode) {
    let mut children = std::mem::take(&mut node.children);
    for child in &mut children {
        rollup(child);
        node.rec_size += child.rec_size;
        node.rec_files += child.rec_files;
        node.rec_dirs += child.rec_dirs;
        node.rec_new_file = node.rec_new_file.max(child.rec_new_file);
        node.rec_old_file = node.rec_old_file.min(child.rec_old_file);
    }
    node.children = children;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_files(name: &str, files: &[(u64, i64)]) -> DirNode {
        let mut node = DirNode::new(name.to_string());
        for &(size, mtime) in files {
            node.record_file(size, mtime);
        }
        node
    }

    #[test]
    fn test_new_node_has_sentinels() {
        let node = DirNode::new("/root".to_string());
        assert_eq!(node.imm_old_file, OLDEST_SENTINEL);
        assert_eq!(node.imm_new_file, NEWEST_SENTINEL);
        assert_eq!(node.imm_size, 0);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_record_file_updates_extrema() {
        let node = node_with_files("/root", &[(100, 50), (200, 10), (10, 99)]);
        assert_eq!(node.imm_size, 310);
        assert_eq!(node.imm_files, 3);
        assert_eq!(node.imm_old_file, 10);
        assert_eq!(node.imm_new_file, 99);
        assert_eq!(node.rec_size, 310);
    }

    #[test]
    fn test_rollup_sums_subtree() {
        // root/{f(100), d1/{f(50), f(25), d2/{f(1000)}}}
        let mut root = node_with_files("/root", &[(100, 500)]);
        let mut d1 = node_with_files("/root/d1", &[(50, 100), (25, 900)]);
        let d2 = node_with_files("/root/d1/d2", &[(1000, 700)]);
        d1.record_subdir();
        d1.children.push(d2);
        root.record_subdir();
        root.children.push(d1);

        rollup(&mut root);

        assert_eq!(root.rec_size, 1175);
        assert_eq!(root.rec_files, 4);
        assert_eq!(root.rec_dirs, 2);
        assert_eq!(root.imm_size, 100);
        assert_eq!(root.children[0].rec_size, 1075);
        assert_eq!(root.children[0].imm_size, 75);
        assert_eq!(root.children[0].children[0].rec_size, 1000);

        // extrema fold across the whole subtree
        assert_eq!(root.rec_old_file, 100);
        assert_eq!(root.rec_new_file, 900);
        // immediate extrema untouched by roll-up
        assert_eq!(root.imm_old_file, 500);
        assert_eq!(root.imm_new_file, 500);
    }

    #[test]
    fn test_rollup_immediate_recursive_consistency() {
        let mut root = node_with_files("/r", &[(10, 1), (20, 2)]);
        for i in 0..3u64 {
            let child = node_with_files(&format!("/r/c{i}"), &[(100 * (i + 1), 50)]);
            root.record_subdir();
            root.children.push(child);
        }
        rollup(&mut root);

        let child_sum: u64 = root.children.iter().map(|c| c.rec_size).sum();
        assert_eq!(root.rec_size, root.imm_size + child_sum);
        let child_files: u64 = root.children.iter().map(|c| c.rec_files).sum();
        assert_eq!(root.rec_files, root.imm_files + child_files);
    }

    #[test]
    fn test_rollup_empty_children_keep_sentinels() {
        let mut root = DirNode::new("/r".to_string());
        let empty = DirNode::new("/r/empty".to_string());
        root.record_subdir();
        root.children.push(empty);
        rollup(&mut root);

        assert_eq!(root.rec_old_file, OLDEST_SENTINEL);
        assert_eq!(root.rec_new_file, NEWEST_SENTINEL);
        assert_eq!(root.rec_dirs, 1);
    }

    #[test]
    fn test_node_count() {
        let mut root = DirNode::new("/r".to_string());
        let mut a = DirNode::new("/r/a".to_string());
        a.children.push(DirNode::new("/r/a/b".to_string()));
        root.children.push(a);
        assert_eq!(root.node_count(), 3);
    }
}
