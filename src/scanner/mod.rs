//! Recursive directory scanner used when a descriptor lists no items.

use crate::paths;
use crate::tree::{NodeInfo, TreeNode};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};


/// Entries whose name starts with this marker are never listed
pub const HIDDEN_PREFIX: char = '.';

/// Scan `dir` into a group node named `display_name`
///
/// Returns `None` when `dir` is missing or not a directory. Names in `ignore`
/// are skipped among the direct subdirectories of `dir` only. Subdirectories
/// are kept only when they yield at least one child; the returned root itself
/// may be empty. Directory symlinks are followed unless they lead back to a
/// directory already being scanned.
pub fn scan(dir: &Path, display_name: &str, ignore: &[String]) -> Option<TreeNode> {
    if !dir.is_dir() {
        return None;
    }
    let mut ancestors = HashSet::new();
    Some(scan_dir(dir, display_name, ignore, &mut ancestors))
}

fn scan_dir(
    dir: &Path,
    display_name: &str,
    ignore: &[String],
    ancestors: &mut HashSet<PathBuf>,
) -> TreeNode {
    let info = NodeInfo::new(display_name, display_name)
        .with_path(paths::file_name(dir))
        .with_full_path(dir);
    let mut node = TreeNode::group(info);

    let key = canonical(dir);
    ancestors.insert(key.clone());

    for entry in list_entries(dir) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(HIDDEN_PREFIX) {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if ignore.iter().any(|i| *i == name) {
                continue;
            }
            if ancestors.contains(&canonical(entry.path())) {
                debug!("skipping {}: directory cycle", entry.path().display());
                continue;
            }
            let sub = scan_dir(entry.path(), &name, &[], ancestors);
            if sub.has_children() {
                node.push(sub);
            }
        } else if file_type.is_file() {
            node.push(file_node(&name, entry.path()));
        } else {
            debug!("skipping {}", entry.path().display());
        }
    }

    ancestors.remove(&key);
    node
}

fn canonical(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

fn file_node(name: &str, full_path: &Path) -> TreeNode {
    TreeNode::file(
        NodeInfo::new(name, name)
            .with_path(name)
            .with_full_path(full_path),
    )
}

/// Direct entries of `dir`, directories first, then case-insensitive by name
///
/// Symlinks are reported with the type of their target. I/O failures,
/// including dangling links, are logged and the affected entries dropped.
fn list_entries(dir: &Path) -> Vec<DirEntry> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by(compare_entries);

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!("Error scanning directory {}: {}", dir.display(), err),
        }
    }
    entries
}

fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    b_dir
        .cmp(&a_dir)
        .then_with(|| {
            let a_name = a.file_name().to_string_lossy().to_lowercase();
            let b_name = b.file_name().to_string_lossy().to_lowercase();
            a_name.cmp(&b_name)
        })
        .then_with(|| a.file_name().cmp(b.file_name()))
}
