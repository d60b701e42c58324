pub use kd_tree::{KdNode, KdPrimitive, KdTree, KD_TREE_LEAF_EPSILON};
pub use kd_tree_build::{KdTreeBuildError, KdTreeBuildOptions, KdTreeBuilder};

mod kd_tree;
mod kd_tree_build;
mod kd_tree_traverse;
mod kd_tree_validation;
