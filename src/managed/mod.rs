//! Parser for XML managed project files (`.csproj`, `.vbproj`, `.fsproj`).

mod items;


pub use items::{ItemKind, ProjectItem, ProjectItems};

use crate::error::{Result, TreeError};
use crate::options::ParseOptions;
use crate::parser::ProjectParser;
use crate::paths;
use crate::scanner;
use crate::tree::{NodeInfo, TreeNode};
use log::debug;
use std::fs;
use std::path::Path;

pub const SOURCE_FILES_ID: &str = "source_files";
pub const SOURCE_FILES_NAME: &str = "Source Files";
pub const REFERENCES_ID: &str = "references";
pub const REFERENCES_NAME: &str = "References";

/// Builds a tree from a managed project file
///
/// The root holds, in order: the non-empty well-known folders, "Source Files"
/// and "References". Declared items only appear when they exist on disk; a
/// project that yields no source file is scanned from its directory instead.
#[derive(Debug, Clone, Default)]
pub struct ManagedProjectParser {
    options: ParseOptions,
}

impl ManagedProjectParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the project file at `path`
    pub fn parse_project(&self, path: &Path) -> Result<TreeNode> {
        if !path.exists() {
            return Err(TreeError::FileNotFound(path.to_path_buf()));
        }
        let project_path = paths::absolutize(path).map_err(|e| TreeError::io(path, e))?;
        let project_dir = paths::parent_dir(&project_path);
        let project_name = paths::file_name(&project_path);
        debug!("parsing managed project {}", project_path.display());

        let text = fs::read_to_string(&project_path).map_err(|e| TreeError::io(path, e))?;
        let items = ProjectItems::from_xml(&text)?;

        let mut root = TreeNode::group(
            NodeInfo::new("root", &project_name)
                .with_path(&project_name)
                .with_full_path(&project_path),
        );

        for dir_name in &self.options.well_known_dirs {
            if let Some(node) = scanner::scan(&project_dir.join(dir_name), dir_name, &[]) {
                if node.has_children() {
                    root.push(node);
                }
            }
        }

        let mut sources = Vec::new();
        for item in items.sources() {
            let full_path = paths::resolve(&project_dir, &item.include);
            if full_path.is_file() {
                sources.push(TreeNode::file(
                    NodeInfo::new(&item.include, paths::display_name(&item.include))
                        .with_path(&item.include)
                        .with_full_path(full_path),
                ));
            }
        }

        if sources.is_empty() {
            debug!("no declared source files found, scanning {}", project_dir.display());
            let ignore = self.options.fallback_ignore_list();
            if let Some(scanned) = scanner::scan(&project_dir, SOURCE_FILES_NAME, &ignore) {
                sources = scanned.into_children();
            }
        }

        if !sources.is_empty() {
            let info = NodeInfo::new(SOURCE_FILES_ID, SOURCE_FILES_NAME).with_full_path(&project_dir);
            root.push(TreeNode::group_with(info, sources));
        }

        let references: Vec<TreeNode> = items
            .references()
            .map(|item| TreeNode::file(NodeInfo::new(&item.include, item.reference_name())))
            .collect();
        if !references.is_empty() {
            root.push(TreeNode::group_with(
                NodeInfo::new(REFERENCES_ID, REFERENCES_NAME),
                references,
            ));
        }

        Ok(root)
    }
}

impl ProjectParser for ManagedProjectParser {
    fn parse(&self, path: &Path) -> Result<TreeNode> {
        self.parse_project(path)
    }

    fn describe(&self) -> &'static str {
        "managed project"
    }
}
