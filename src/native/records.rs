//! Group, file and project records pulled out of the archive's `objects` table.

use super::archive::{Dict, Value};
use super::CONTEXT;
use crate::error::{Result, TreeError};
use crate::paths;
use log::debug;
use std::collections::HashMap;

const GROUP_ISAS: &[&str] = &["PBXGroup", "PBXVariantGroup"];
const FILE_ISA: &str = "PBXFileReference";
const PROJECT_ISA: &str = "PBXProject";

/// Basis a record's `path` is resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTree {
    /// `SOURCE_ROOT`: the directory containing the project bundle
    SourceRoot,
    /// `<group>`: the resolved path of the enclosing group
    Group,
    /// `<absolute>` or any build-setting name
    Other(String),
}

impl SourceTree {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SOURCE_ROOT" => SourceTree::SourceRoot,
            "<group>" => SourceTree::Group,
            other => SourceTree::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub path: Option<String>,
    pub source_tree: Option<SourceTree>,
    /// Child ids in declaration order, not yet resolved
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub source_tree: Option<SourceTree>,
}

/// Id-keyed view of every group and file record plus the root group id
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    pub groups: HashMap<String, GroupRecord>,
    pub files: HashMap<String, FileRecord>,
    pub main_group: String,
}

impl ProjectGraph {
    /// Build the graph from a parsed archive root
    ///
    /// Fails when there are no group records, no file records, or no project
    /// record naming a main group.
    pub fn from_archive(root: &Dict) -> Result<Self> {
        let objects = root
            .get_dict("objects")
            .ok_or_else(|| TreeError::structural(CONTEXT, "Could not find objects table"))?;

        let mut graph = ProjectGraph::default();
        let mut projects = Vec::new();

        for entry in objects.entries() {
            let Some(record) = entry.value.as_dict() else {
                continue;
            };
            let isa = record.get_str("isa").unwrap_or_default();
            let annotation = entry.annotation.as_deref();

            if GROUP_ISAS.contains(&isa) {
                let group = group_record(&entry.key, annotation, record);
                graph.groups.insert(group.id.clone(), group);
            } else if isa == FILE_ISA {
                match file_record(&entry.key, annotation, record) {
                    Some(file) => {
                        graph.files.insert(file.id.clone(), file);
                    }
                    None => debug!("skipping file reference {} without a path", entry.key),
                }
            } else if isa == PROJECT_ISA {
                projects.push((entry.key.as_str(), record));
            }
        }

        if graph.groups.is_empty() {
            return Err(TreeError::structural(CONTEXT, "Could not find PBXGroup section"));
        }
        if graph.files.is_empty() {
            return Err(TreeError::structural(
                CONTEXT,
                "Could not find PBXFileReference section",
            ));
        }

        let root_object = root.get_str("rootObject");
        let project = projects
            .iter()
            .find(|(id, _)| Some(*id) == root_object)
            .or_else(|| projects.first())
            .map(|(_, record)| *record);
        graph.main_group = project
            .and_then(|p| p.get_str("mainGroup"))
            .map(str::to_string)
            .ok_or_else(|| TreeError::structural(CONTEXT, "Could not find main group"))?;

        Ok(graph)
    }

    pub fn group(&self, id: &str) -> Option<&GroupRecord> {
        self.groups.get(id)
    }

    pub fn file(&self, id: &str) -> Option<&FileRecord> {
        self.files.get(id)
    }
}

fn group_record(id: &str, annotation: Option<&str>, record: &Dict) -> GroupRecord {
    let path = record.get_str("path").map(str::to_string);
    let name = record
        .get_str("name")
        .or(annotation)
        .or(path.as_deref())
        .unwrap_or(id)
        .to_string();
    let children = record
        .get("children")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    GroupRecord {
        id: id.to_string(),
        name,
        path,
        source_tree: record.get_str("sourceTree").map(SourceTree::parse),
        children,
    }
}

fn file_record(id: &str, annotation: Option<&str>, record: &Dict) -> Option<FileRecord> {
    let path = record.get_str("path").or(annotation)?.to_string();
    let name = record
        .get_str("name")
        .map(str::to_string)
        .unwrap_or_else(|| paths::display_name(&path));

    Some(FileRecord {
        id: id.to_string(),
        name,
        path,
        source_tree: record.get_str("sourceTree").map(SourceTree::parse),
    })
}
