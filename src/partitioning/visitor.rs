use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// Trait implemented by visitors called during the traversal of a [`KdTree`](super::KdTree).
///
/// The traversal calls `enter` (or `enter_segment` for segment traversals) on internal
/// nodes and the `intersect_*` methods once per primitive of every leaf reached.
///
/// The `primitive` argument of the `intersect_*` methods is the slot of the primitive in
/// [`KdTree::primitive_indices`](super::KdTree::primitive_indices). Vertex indices refer to
/// the `vertices` slice.
pub trait KdTreeVisitor {
    /// Called when the full-tree traversal reaches an internal node.
    ///
    /// Returns `false` to skip the node's subtree. When `true` is returned,
    /// [`KdTreeVisitor::leave`] is called once the subtree has been traversed.
    fn enter(&mut self, aabb: &Aabb) -> bool {
        let _ = aabb;
        true
    }

    /// Called when the segment traversal is about to descend into a node.
    ///
    /// `start` and `end` hold the segment the node is tested against. The visitor may clip
    /// them, typically to the part of the segment lying inside of `aabb`; the clipped
    /// segment is the one passed down to the node's children.
    ///
    /// Returns `false` to skip the node's subtree.
    fn enter_segment(
        &mut self,
        aabb: &Aabb,
        start: &mut Point<Real>,
        end: &mut Point<Real>,
    ) -> bool {
        let _ = (start, end);
        self.enter(aabb)
    }

    /// Called after the subtree of an entered node has been traversed.
    fn leave(&mut self) {}

    /// Called for a point primitive.
    fn intersect_point(&mut self, vertices: &[Point<Real>], primitive: usize, v0: u32);

    /// Called for a line primitive.
    fn intersect_line(&mut self, vertices: &[Point<Real>], primitive: usize, v0: u32, v1: u32);

    /// Called for a triangle primitive.
    fn intersect_triangle(
        &mut self,
        vertices: &[Point<Real>],
        primitive: usize,
        v0: u32,
        v1: u32,
        v2: u32,
    );
}
