//! Aggregator for line-oriented `.sln` solution files.


use crate::error::{Result, TreeError};
use crate::managed::ManagedProjectParser;
use crate::options::ParseOptions;
use crate::parser::ProjectParser;
use crate::paths;
use crate::scanner;
use crate::tree::{NodeInfo, TreeNode};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// `Project("{TYPE-GUID}") = "Name", "relative\path.csproj", "{PROJECT-GUID}"`
static PROJECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*Project\("\{[A-Fa-f0-9-]+\}"\)\s*=\s*"([^"]+)"\s*,\s*"([^"]+)"\s*,\s*"\{[A-Fa-f0-9-]+\}""#,
    )
    .expect("project line pattern is valid")
});

/// A project declared by a solution, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub name: String,
    /// Path relative to the solution directory, as written
    pub path: String,
}

/// Extract project declarations; lines of any other shape are skipped
pub fn project_entries(text: &str) -> Vec<SolutionEntry> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter_map(|line| PROJECT_LINE.captures(line))
        .map(|caps| SolutionEntry {
            name: caps[1].to_string(),
            path: caps[2].to_string(),
        })
        .collect()
}

/// Builds one tree holding every project of a solution
///
/// Managed projects are delegated to [`ManagedProjectParser`]; other project
/// types become a group holding a scan of their directory. Entries whose
/// path does not exist, and managed projects that fail to parse, are left out.
#[derive(Debug, Clone, Default)]
pub struct SolutionParser {
    managed: ManagedProjectParser,
}

impl SolutionParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            managed: ManagedProjectParser::new(options),
        }
    }

    pub fn parse_solution(&self, path: &Path) -> Result<TreeNode> {
        if !path.exists() {
            return Err(TreeError::FileNotFound(path.to_path_buf()));
        }
        let solution_path = paths::absolutize(path).map_err(|e| TreeError::io(path, e))?;
        let solution_dir = paths::parent_dir(&solution_path);
        let solution_name = paths::file_name(&solution_path);
        debug!("parsing solution {}", solution_path.display());

        let bytes = fs::read(&solution_path).map_err(|e| TreeError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| TreeError::parse("solution", e.to_string()))?;

        let mut root = TreeNode::group(
            NodeInfo::new("solution", &solution_name)
                .with_path(&solution_name)
                .with_full_path(&solution_path),
        );

        for entry in project_entries(&text) {
            let project_path = paths::resolve(&solution_dir, &entry.path);
            if !project_path.exists() {
                debug!("skipping {}: {} does not exist", entry.name, project_path.display());
                continue;
            }

            let ext = paths::extension(&project_path);
            if self.managed.options().is_managed_extension(&ext) {
                match self.managed.parse_project(&project_path) {
                    Ok(node) => {
                        root.push(node);
                    }
                    Err(err) => debug!("dropping {}: {}", entry.name, err),
                }
            } else {
                root.push(plain_project(&entry, &project_path));
            }
        }

        Ok(root)
    }
}

/// Group for a non-managed project: a scan of the directory it lives in
fn plain_project(entry: &SolutionEntry, project_path: &Path) -> TreeNode {
    let dir = if project_path.is_dir() {
        project_path.to_path_buf()
    } else {
        paths::parent_dir(project_path)
    };
    let children = scanner::scan(&dir, &entry.name, &[])
        .map(TreeNode::into_children)
        .unwrap_or_default();
    let info = NodeInfo::new(&entry.path, &entry.name)
        .with_path(&entry.path)
        .with_full_path(project_path);
    TreeNode::group_with(info, children)
}

impl ProjectParser for SolutionParser {
    fn parse(&self, path: &Path) -> Result<TreeNode> {
        self.parse_solution(path)
    }

    fn describe(&self) -> &'static str {
        "solution"
    }
}
