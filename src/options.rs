/// Conventional folder names probed next to a managed project file
pub const DEFAULT_WELL_KNOWN_DIRS: &[&str] =
    &["Properties", "Models", "Views", "Controllers", "Services", "Data"];

/// Extensions handled by the managed project parser (without the dot)
pub const DEFAULT_MANAGED_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj"];

/// Tunables shared by the descriptor parsers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Folders scanned and attached as top-level groups of a managed project
    pub well_known_dirs: Vec<String>,
    /// Extra top-level directory names skipped by the managed fallback scan
    pub ignored_dirs: Vec<String>,
    /// Lowercase extensions that identify managed project files
    pub managed_extensions: Vec<String>,
}

impl ParseOptions {
    /// Create options with the default well-known folders and extensions
    pub fn new() -> Self {
        Self {
            well_known_dirs: DEFAULT_WELL_KNOWN_DIRS.iter().map(|s| s.to_string()).collect(),
            ignored_dirs: Vec::new(),
            managed_extensions: DEFAULT_MANAGED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the well-known folder list
    pub fn well_known_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.well_known_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Append one folder to the well-known list
    pub fn add_well_known_dir(mut self, dir: impl Into<String>) -> Self {
        let dir = dir.into();
        if !self.well_known_dirs.contains(&dir) {
            self.well_known_dirs.push(dir);
        }
        self
    }

    pub fn ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn managed_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.managed_extensions = exts
            .into_iter()
            .map(|e| {
                let e: String = e.into();
                e.trim().trim_start_matches('.').to_ascii_lowercase()
            })
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Names excluded from the managed fallback scan: well-known folders plus `ignored_dirs`
    pub fn fallback_ignore_list(&self) -> Vec<String> {
        self.well_known_dirs
            .iter()
            .chain(self.ignored_dirs.iter())
            .cloned()
            .collect()
    }

    /// Whether `ext` (any case, no dot) names a managed project file
    pub fn is_managed_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.managed_extensions.iter().any(|e| *e == ext)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
