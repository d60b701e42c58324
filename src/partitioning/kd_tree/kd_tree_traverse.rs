use super::{KdNode, KdTree};
use crate::math::{Point, Real};
use crate::partitioning::KdTreeVisitor;

impl KdTree {
    /// Traverses the whole tree, calling `visitor` on every internal node and every primitive
    /// of the leaves reached.
    ///
    /// Subtrees of internal nodes for which [`KdTreeVisitor::enter`] returns `false` are
    /// skipped.
    pub fn intersect(&self, visitor: &mut impl KdTreeVisitor) {
        if !self.nodes.is_empty() {
            self.intersect_from(visitor, 0);
        }
    }

    /// Traverses the subtree rooted at the node `node_id`.
    pub fn intersect_from(&self, visitor: &mut impl KdTreeVisitor, node_id: u32) {
        let Some(node) = self.nodes.get(node_id as usize) else {
            return;
        };

        match node.children() {
            None => self.intersect_leaf(visitor, node),
            Some(children) => {
                if visitor.enter(&node.aabb) {
                    for child in children.into_iter().flatten() {
                        self.intersect_from(visitor, child);
                    }

                    visitor.leave();
                }
            }
        }
    }

    /// Traverses the tree along the segment `[start, end]`.
    ///
    /// The root box is entered first with [`KdTreeVisitor::enter_segment`], which may clip
    /// the segment. Every child is then entered with the segment as its parent received it.
    pub fn intersect_line_segment(
        &self,
        visitor: &mut impl KdTreeVisitor,
        start: &Point<Real>,
        end: &Point<Real>,
    ) {
        let Some(root) = self.nodes.first() else {
            return;
        };

        let mut s = *start;
        let mut e = *end;

        if visitor.enter_segment(&root.aabb, &mut s, &mut e) {
            self.intersect_line_segment_from(visitor, 0, &s, &e);
        }
    }

    /// Traverses the subtree rooted at `node_id` along the segment `[start, end]`.
    ///
    /// The root of the subtree is assumed to have been entered already.
    pub fn intersect_line_segment_from(
        &self,
        visitor: &mut impl KdTreeVisitor,
        node_id: u32,
        start: &Point<Real>,
        end: &Point<Real>,
    ) {
        let Some(node) = self.nodes.get(node_id as usize) else {
            return;
        };

        match node.children() {
            None => self.intersect_leaf(visitor, node),
            Some(children) => {
                for child_id in children.into_iter().flatten() {
                    let Some(child) = self.nodes.get(child_id as usize) else {
                        continue;
                    };

                    // Each child starts from the segment given to its parent.
                    let mut s = *start;
                    let mut e = *end;

                    if visitor.enter_segment(&child.aabb, &mut s, &mut e) {
                        self.intersect_line_segment_from(visitor, child_id, &s, &e);
                    }
                }
            }
        }
    }

    fn intersect_leaf(&self, visitor: &mut impl KdTreeVisitor, node: &KdNode) {
        let Some(range) = node.leaf_range() else {
            return;
        };

        for slot in range {
            match self.primitive_vertex_indices(slot) {
                Some(&[v0, v1, v2]) => {
                    visitor.intersect_triangle(&self.vertices, slot, v0, v1, v2)
                }
                Some(&[v0, v1]) => visitor.intersect_line(&self.vertices, slot, v0, v1),
                Some(&[v0]) => visitor.intersect_point(&self.vertices, slot, v0),
                Some(indices) => log::warn!(
                    "KdTree::intersect encountered unsupported primitive size of {}",
                    indices.len()
                ),
                None => log::warn!(
                    "KdTree::intersect encountered an invalid primitive slot {}",
                    slot
                ),
            }
        }
    }
}
