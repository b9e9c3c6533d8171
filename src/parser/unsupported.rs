use super::ProjectParser;
use crate::error::{Result, TreeError};
use crate::tree::TreeNode;
use std::path::Path;

/// Fallback for extensions no parser is registered for
///
/// Never touches the filesystem.
pub struct UnsupportedParser;

impl ProjectParser for UnsupportedParser {
    fn parse(&self, path: &Path) -> Result<TreeNode> {
        Err(TreeError::UnsupportedType(path.to_path_buf()))
    }

    fn describe(&self) -> &'static str {
        "unsupported"
    }
}
