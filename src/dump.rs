//! Full per-directory CSV dump
//!
//! One row per directory in pre-order, so a parent always precedes its
//! subtree and the `depth` column reconstructs the hierarchy. Byte columns
//! are humanized unless flat units are requested; age columns are compact
//! durations (`3d4h`) normally and fractional days (with `_days` headers)
//! under flat units. Extrema that never saw a file render as `NA`.

use crate::error::Result;
use crate::fmt::{age_days_str, age_str, bytes_str, unix_seconds};
use crate::tree::DirNode;
use std::io::Write;
use std::time::SystemTime;

const HEADER: &[&str] = &[
    "path",
    "imm_size",
    "imm_files",
    "imm_dirs",
    "rec_size",
    "rec_files",
    "rec_dirs",
    "imm_oldest",
    "imm_newest",
    "rec_oldest",
    "rec_newest",
    "depth",
];

const HEADER_FLAT: &[&str] = &[
    "path",
    "imm_size",
    "imm_files",
    "imm_dirs",
    "rec_size",
    "rec_files",
    "rec_dirs",
    "imm_oldest_days",
    "imm_newest_days",
    "rec_oldest_days",
    "rec_newest_days",
    "depth",
];

/// Write the whole tree as CSV. Ages are relative to one `now` captured at
/// the start so every row uses the same reference point.
pub fn dump_csv<W: Write>(out: W, root: &DirNode, flat: bool) -> Result<()> {
    let now = unix_seconds(SystemTime::now());
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(if flat { HEADER_FLAT } else { HEADER })?;
    write_node(&mut writer, root, 0, now, flat)?;
    writer.flush()?;
    Ok(())
}

fn write_node<W: Write>(
    writer: &mut csv::Writer<W>,
    node: &DirNode,
    depth: usize,
    now: i64,
    flat: bool,
) -> Result<()> {
    let age = |mtime: i64| {
        if flat {
            age_days_str(mtime, now)
        } else {
            age_str(mtime, now)
        }
    };

    let row = [
        node.name.clone(),
        bytes_str(node.imm_size, flat),
        node.imm_files.to_string(),
        node.imm_dirs.to_string(),
        bytes_str(node.rec_size, flat),
        node.rec_files.to_string(),
        node.rec_dirs.to_string(),
        age(node.imm_old_file),
        age(node.imm_new_file),
        age(node.rec_old_file),
        age(node.rec_new_file),
        depth.to_string(),
    ];
    writer.write_record(&row)?;

    for child in &node.children {
        write_node(writer, child, depth + 1, now, flat)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::rollup;

    fn sample_tree() -> DirNode {
        let mut root = DirNode::new("/r".into());
        root.record_file(100, 1_000_000);
        let mut child = DirNode::new("/r/sub".into());
        child.record_file(50, 2_000_000);
        root.record_subdir();
        root.children.push(child);
        rollup(&mut root);
        root
    }

    fn dump_to_lines(root: &DirNode, flat: bool) -> Vec<String> {
        let mut buf = Vec::new();
        dump_csv(&mut buf, root, flat).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_dump_header_and_row_count() {
        let root = sample_tree();
        let lines = dump_to_lines(&root, true);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "path,imm_size,imm_files,imm_dirs,rec_size,rec_files,rec_dirs,\
             imm_oldest_days,imm_newest_days,rec_oldest_days,rec_newest_days,depth"
        );
    }

    #[test]
    fn test_dump_preorder_and_depth() {
        let root = sample_tree();
        let lines = dump_to_lines(&root, true);
        assert!(lines[1].starts_with("/r,100,1,1,150,2,1,"));
        assert!(lines[1].ends_with(",0"));
        assert!(lines[2].starts_with("/r/sub,50,1,0,"));
        assert!(lines[2].ends_with(",1"));
    }

    #[test]
    fn test_dump_humanized_header_has_no_days_suffix() {
        let root = sample_tree();
        let lines = dump_to_lines(&root, false);
        assert!(lines[0].contains("imm_oldest,"));
        assert!(!lines[0].contains("_days"));
    }

    #[test]
    fn test_empty_dir_ages_render_na() {
        let mut root = DirNode::new("/empty".into());
        rollup(&mut root);
        let lines = dump_to_lines(&root, true);
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(&fields[7..11], &["NA", "NA", "NA", "NA"]);
    }
}
