// Public API exports
pub mod error;
pub mod managed;
pub mod native;
pub mod options;
pub mod parser;
pub mod paths;
pub mod scanner;
pub mod solution;
pub mod tree;

// Re-export main types for convenience
pub use error::{ErrorPayload, TreeError};
pub use options::ParseOptions;
pub use tree::{NodeInfo, NodeKind, TreeNode};

pub use parser::{ParserRegistry, ProjectParser, UnsupportedParser};

pub use managed::ManagedProjectParser;
pub use native::NativeProjectParser;
pub use solution::SolutionParser;

use std::path::Path;

/// Parse any supported descriptor with the default registry for `options`
pub fn parse_descriptor(path: &Path, options: ParseOptions) -> error::Result<TreeNode> {
    ParserRegistry::with_options(options).parse(path)
}
