//! Parser for the native IDE's `project.pbxproj` archives.
//!
//! The archive is read into an id-keyed graph of group and file records
//! ([`ProjectGraph`]), then the main group is materialized into a
//! [`TreeNode`] by an explicit-stack traversal. A group that is already on
//! the current descent path is reported as a structural error instead of
//! being expanded again.

pub mod archive;
pub mod lexer;
mod records;

#[cfg(test)]
mod tests;

pub use records::{FileRecord, GroupRecord, ProjectGraph, SourceTree};

use crate::error::{Result, TreeError};
use crate::parser::ProjectParser;
use crate::paths;
use crate::tree::{NodeInfo, TreeNode};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const CONTEXT: &str = "pbxproj";

/// File name of the archive inside a project bundle
pub const ARCHIVE_FILE_NAME: &str = "project.pbxproj";

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProjectParser;

/// A group whose children are still being visited
struct Frame<'g> {
    group: &'g GroupRecord,
    dir: PathBuf,
    next: usize,
    children: Vec<TreeNode>,
}

impl<'g> Frame<'g> {
    fn new(group: &'g GroupRecord, dir: PathBuf) -> Self {
        Self {
            group,
            dir,
            next: 0,
            children: Vec::new(),
        }
    }

    /// Kept when it has children or its directory exists
    fn into_node(self) -> Option<TreeNode> {
        let mut info = NodeInfo::new(&self.group.id, &self.group.name).with_existing_path(self.dir);
        info.path = self.group.path.clone();
        if self.children.is_empty() && info.full_path.is_none() {
            return None;
        }
        Some(TreeNode::group_with(info, self.children))
    }
}

impl NativeProjectParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an archive file, or a bundle directory containing one
    pub fn parse_project(&self, path: &Path) -> Result<TreeNode> {
        let archive_path = if path.is_dir() {
            path.join(ARCHIVE_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        if !archive_path.exists() {
            return Err(TreeError::FileNotFound(archive_path));
        }
        let archive_path =
            paths::absolutize(&archive_path).map_err(|e| TreeError::io(&archive_path, e))?;
        debug!("parsing native project {}", archive_path.display());

        let text = fs::read_to_string(&archive_path).map_err(|e| TreeError::io(&archive_path, e))?;
        let bundle_dir = paths::parent_dir(&archive_path);
        let project_dir = paths::parent_dir(&bundle_dir);

        let root = archive::parse(&text)?;
        let graph = ProjectGraph::from_archive(&root)?;
        let children = self.materialize(&graph, &project_dir)?;

        let name = bundle_dir
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let info = NodeInfo::new("root", name)
            .with_path(paths::file_name(&bundle_dir))
            .with_full_path(&bundle_dir);
        Ok(TreeNode::group_with(info, children))
    }

    /// Resolve the main group's children against `project_dir`
    pub fn materialize(&self, graph: &ProjectGraph, project_dir: &Path) -> Result<Vec<TreeNode>> {
        let main = graph.group(&graph.main_group).ok_or_else(|| {
            TreeError::structural(
                CONTEXT,
                format!("main group {} is not a group record", graph.main_group),
            )
        })?;

        let mut visiting: HashSet<&str> = HashSet::new();
        visiting.insert(main.id.as_str());
        let main_dir = resolve_group_dir(main, project_dir, project_dir);
        let mut stack = vec![Frame::new(main, main_dir)];

        while let Some(frame) = stack.last_mut() {
            let group = frame.group;
            let Some(child_id) = group.children.get(frame.next) else {
                let Some(done) = stack.pop() else { break };
                visiting.remove(done.group.id.as_str());
                match stack.last_mut() {
                    Some(parent) => {
                        if let Some(node) = done.into_node() {
                            parent.children.push(node);
                        }
                    }
                    None => return Ok(done.children),
                }
                continue;
            };
            frame.next += 1;

            if let Some(sub) = graph.group(child_id) {
                if !visiting.insert(sub.id.as_str()) {
                    return Err(TreeError::structural(
                        CONTEXT,
                        format!("cycle detected at group {}", sub.id),
                    ));
                }
                let dir = resolve_group_dir(sub, &frame.dir, project_dir);
                stack.push(Frame::new(sub, dir));
            } else if let Some(file) = graph.file(child_id) {
                if let Some(node) = file_node(file, &frame.dir, project_dir) {
                    frame.children.push(node);
                }
            } else {
                debug!("group {} references unknown id {}", group.id, child_id);
            }
        }

        Ok(Vec::new())
    }
}

impl ProjectParser for NativeProjectParser {
    fn parse(&self, path: &Path) -> Result<TreeNode> {
        self.parse_project(path)
    }

    fn describe(&self) -> &'static str {
        "native project"
    }
}

/// Directory a group stands for; groups without a usable path inherit `parent`
fn resolve_group_dir(group: &GroupRecord, parent: &Path, project_dir: &Path) -> PathBuf {
    match (&group.source_tree, &group.path) {
        (Some(SourceTree::SourceRoot), Some(path)) => paths::resolve(project_dir, path),
        (Some(SourceTree::Group), Some(path)) => paths::resolve(parent, path),
        _ => parent.to_path_buf(),
    }
}

/// File node, or None when the resolved path does not exist
fn file_node(file: &FileRecord, parent: &Path, project_dir: &Path) -> Option<TreeNode> {
    let full_path = match &file.source_tree {
        Some(SourceTree::SourceRoot) => paths::resolve(project_dir, &file.path),
        Some(SourceTree::Group) => paths::resolve(parent, &file.path),
        _ => paths::declared(&file.path),
    };
    if !full_path.exists() {
        return None;
    }
    let full_path = paths::absolutize(&full_path).unwrap_or(full_path);
    Some(TreeNode::file(
        NodeInfo::new(&file.id, &file.name)
            .with_path(&file.path)
            .with_full_path(full_path),
    ))
}
