use super::{ProjectParser, UnsupportedParser};
use crate::error::Result;
use crate::managed::ManagedProjectParser;
use crate::native::NativeProjectParser;
use crate::options::ParseOptions;
use crate::paths;
use crate::solution::SolutionParser;
use crate::tree::TreeNode;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Dynamic dispatch table from descriptor extension to parser
pub struct ParserRegistry {
    /// Fallback parser for unknown extensions
    fallback: Box<dyn ProjectParser>,
    /// Extension -> Parser mapping
    map: HashMap<String, Box<dyn ProjectParser>>,
}

impl ParserRegistry {
    /// Create an empty registry with UnsupportedParser as fallback
    pub fn new() -> Self {
        Self {
            fallback: Box::new(UnsupportedParser),
            map: HashMap::new(),
        }
    }

    /// Registry with the solution, managed and native parsers registered
    ///
    /// Managed extensions come from `options.managed_extensions`.
    pub fn with_options(options: ParseOptions) -> Self {
        let mut registry = Self::new();
        registry.register("sln", SolutionParser::new(options.clone()));
        for ext in &options.managed_extensions {
            registry.register(ext.clone(), ManagedProjectParser::new(options.clone()));
        }
        registry.register("pbxproj", NativeProjectParser::new());
        registry.register("xcodeproj", NativeProjectParser::new());
        registry
    }

    /// Register a parser for a file extension (without dot, any case)
    ///
    /// # Example
    /// ```ignore
    /// registry.register("sln", SolutionParser::default());
    /// registry.register("pbxproj", NativeProjectParser::new());
    /// ```
    pub fn register(&mut self, extension: impl Into<String>, parser: impl ProjectParser + 'static) {
        self.map
            .insert(extension.into().to_lowercase(), Box::new(parser));
    }

    /// Select the parser for a path by its extension
    ///
    /// Falls back to UnsupportedParser if no extension-specific parser exists
    pub fn select(&self, path: &Path) -> &dyn ProjectParser {
        let ext = paths::extension(path);
        self.map.get(&ext).map(|p| &**p).unwrap_or(&*self.fallback)
    }

    /// Select a parser and run it
    pub fn parse(&self, path: &Path) -> Result<TreeNode> {
        let parser = self.select(path);
        debug!("dispatching {} to {} parser", path.display(), parser.describe());
        parser.parse(path)
    }

    /// Get the number of registered parsers (excluding fallback)
    pub fn parser_count(&self) -> usize {
        self.map.len()
    }

    /// List all registered extensions, sorted
    pub fn registered_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.map.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_options(ParseOptions::default())
    }
}
