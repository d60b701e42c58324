//! Spatial partitioning tools.

pub use self::kd_tree::{
    KdNode, KdPrimitive, KdTree, KdTreeBuildError, KdTreeBuildOptions, KdTreeBuilder,
    KD_TREE_LEAF_EPSILON,
};
pub use self::visitor::KdTreeVisitor;

mod kd_tree;
mod visitor;
