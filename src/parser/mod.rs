mod registry;
mod unsupported;


pub use registry::ParserRegistry;
pub use unsupported::UnsupportedParser;

use crate::error::Result;
use crate::tree::TreeNode;
use std::path::Path;

/// Core trait implemented by every descriptor parser
pub trait ProjectParser: Send + Sync {
    /// Parse the descriptor at `path` into a normalized tree
    ///
    /// # Arguments
    /// * `path` - Descriptor file (or bundle directory) on disk
    ///
    /// # Returns
    /// The root group of the project, or the error to report to the caller
    fn parse(&self, path: &Path) -> Result<TreeNode>;

    /// Short label used in log lines
    fn describe(&self) -> &'static str;
}
