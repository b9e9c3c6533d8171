use crate::error::{Result, TreeError};
use roxmltree::{Document, Node};

/// Item element kinds read from a managed project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Compile,
    Content,
    None,
    Reference,
    ProjectReference,
}

impl ItemKind {
    /// Source-like items, in the order they are collected
    pub const SOURCES: [ItemKind; 3] = [ItemKind::Compile, ItemKind::Content, ItemKind::None];
    /// Reference items, in the order they are collected
    pub const REFERENCES: [ItemKind; 2] = [ItemKind::Reference, ItemKind::ProjectReference];

    pub fn element_name(self) -> &'static str {
        match self {
            ItemKind::Compile => "Compile",
            ItemKind::Content => "Content",
            ItemKind::None => "None",
            ItemKind::Reference => "Reference",
            ItemKind::ProjectReference => "ProjectReference",
        }
    }

    pub fn is_source(self) -> bool {
        Self::SOURCES.contains(&self)
    }
}

/// One item element with an `Include` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub kind: ItemKind,
    pub include: String,
}

impl ProjectItem {
    /// Reference display name: the `Include` value up to the first comma
    ///
    /// `System.Web, Version=4.0.0.0, Culture=neutral` becomes `System.Web`.
    pub fn reference_name(&self) -> &str {
        match self.include.split_once(',') {
            Some((name, _)) => name.trim(),
            None => &self.include,
        }
    }
}

/// Items declared by a project document, grouped by kind in collection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectItems {
    items: Vec<ProjectItem>,
}

impl ProjectItems {
    /// Extract items from project XML
    ///
    /// Lookups use the root element's namespace, so both the legacy
    /// `http://schemas.microsoft.com/developer/msbuild/2003` documents and
    /// namespace-less SDK-style documents are read.
    pub fn from_xml(text: &str) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let doc = Document::parse(text).map_err(|e| TreeError::parse("project", e.to_string()))?;
        let root = doc.root_element();
        let namespace = root.tag_name().namespace();

        let mut items = Vec::new();
        for kind in ItemKind::SOURCES.into_iter().chain(ItemKind::REFERENCES) {
            for node in root.descendants().skip(1) {
                if !matches_item(node, kind, namespace) {
                    continue;
                }
                if let Some(include) = node.attribute("Include").filter(|s| !s.is_empty()) {
                    items.push(ProjectItem {
                        kind,
                        include: include.to_string(),
                    });
                }
            }
        }

        Ok(Self { items })
    }

    pub fn sources(&self) -> impl Iterator<Item = &ProjectItem> {
        self.items.iter().filter(|i| i.kind.is_source())
    }

    pub fn references(&self) -> impl Iterator<Item = &ProjectItem> {
        self.items.iter().filter(|i| !i.kind.is_source())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn matches_item(node: Node, kind: ItemKind, namespace: Option<&str>) -> bool {
    node.is_element()
        && node.tag_name().name() == kind.element_name()
        && node.tag_name().namespace() == namespace
}
