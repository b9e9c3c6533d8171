//! The normalized project tree shared by every descriptor parser.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};

/// Attributes common to groups and files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Stable key, unique within the producing parser's namespace
    pub id: String,
    /// Display label
    pub name: String,
    /// Path as recorded by the descriptor (None when nothing was declared)
    pub path: Option<String>,
    /// Resolved filesystem path (None when it does not resolve to anything on disk)
    pub full_path: Option<PathBuf>,
}

/// A node of the normalized tree
///
/// Serializes as `{ "id", "name", "path", "fullPath", "type": "group" | "file" }`,
/// with a `children` array on groups only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Logical container; child order is declaration or sort order
    Group {
        info: NodeInfo,
        children: Vec<TreeNode>,
    },
    /// Leaf file reference
    File { info: NodeInfo },
}

/// Discriminant of a [`TreeNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Group,
    File,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::File => "file",
        }
    }
}

impl NodeInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: None,
            full_path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_full_path(mut self, full_path: impl Into<PathBuf>) -> Self {
        self.full_path = Some(full_path.into());
        self
    }

    /// Set `full_path` only when the path exists on disk
    pub fn with_existing_path(mut self, full_path: impl Into<PathBuf>) -> Self {
        let full_path = full_path.into();
        self.full_path = full_path.exists().then_some(full_path);
        self
    }
}

impl TreeNode {
    /// Create an empty group
    pub fn group(info: NodeInfo) -> Self {
        TreeNode::Group {
            info,
            children: Vec::new(),
        }
    }

    /// Create a group with the given children
    pub fn group_with(info: NodeInfo, children: Vec<TreeNode>) -> Self {
        TreeNode::Group { info, children }
    }

    pub fn file(info: NodeInfo) -> Self {
        TreeNode::File { info }
    }

    pub fn info(&self) -> &NodeInfo {
        match self {
            TreeNode::Group { info, .. } | TreeNode::File { info } => info,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Group { .. } => NodeKind::Group,
            TreeNode::File { .. } => NodeKind::File,
        }
    }

    pub fn id(&self) -> &str {
        &self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn path(&self) -> Option<&str> {
        self.info().path.as_deref()
    }

    pub fn full_path(&self) -> Option<&Path> {
        self.info().full_path.as_deref()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TreeNode::Group { .. })
    }

    /// Children of a group; always empty for files
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Group { children, .. } => children,
            TreeNode::File { .. } => &[],
        }
    }

    /// Append a child. Returns false (and drops the child) when `self` is a file.
    pub fn push(&mut self, child: TreeNode) -> bool {
        match self {
            TreeNode::Group { children, .. } => {
                children.push(child);
                true
            }
            TreeNode::File { .. } => false,
        }
    }

    /// Consume the node and return its children
    pub fn into_children(self) -> Vec<TreeNode> {
        match self {
            TreeNode::Group { children, .. } => children,
            TreeNode::File { .. } => Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Depth-first, pre-order walk over this node and all descendants
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// Find the first direct child with the given display name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|c| c.name() == name)
    }

    /// Serialize to a compact JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let info = self.info();
        let len = if self.is_group() { 6 } else { 5 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("id", &info.id)?;
        map.serialize_entry("name", &info.name)?;
        map.serialize_entry("path", &info.path)?;
        map.serialize_entry(
            "fullPath",
            &info.full_path.as_ref().map(|p| p.to_string_lossy()),
        )?;
        map.serialize_entry("type", self.kind().as_str())?;
        if let TreeNode::Group { children, .. } = self {
            map.serialize_entry("children", children)?;
        }
        map.end()
    }
}
