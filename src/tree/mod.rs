mod node;


pub use node::{NodeInfo, NodeKind, TreeNode};
