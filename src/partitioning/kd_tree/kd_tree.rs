use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

/// The amount by which the bounding box of every leaf is enlarged after being computed.
///
/// This avoids zero-thickness boxes (e.g. around axis-aligned triangles) and float-precision
/// misses when clipping segments against leaf boxes.
pub const KD_TREE_LEAF_EPSILON: Real = 1.0e-6;

/// A node of a [`KdTree`].
///
/// The meaning of `first` and `second` depends on the kind of node:
/// - if `first < 0` the node is a **leaf**. Its primitives are the slots
///   `[-first - 1, -first - 1 + second)` of [`KdTree::primitive_indices`].
/// - otherwise the node is **internal**, and `first`/`second` are the indices of its left and
///   right children in [`KdTree::nodes`]. A child index of `0` means that there is no child on
///   that side. The root always lives at index `0` and is never the child of another node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KdNode {
    /// The bounding box of the node.
    ///
    /// For leaves, this tightly encloses the vertices of its primitives, enlarged by
    /// [`KD_TREE_LEAF_EPSILON`]. For internal nodes, this is the union of the boxes of its
    /// children.
    pub aabb: Aabb,
    /// The encoded start of the primitive range (leaves) or the left child (internal nodes).
    pub first: i32,
    /// The number of primitives (leaves) or the right child (internal nodes).
    pub second: i32,
}

impl KdNode {
    /// Creates a leaf node covering `count` primitives starting at the slot `start`.
    #[inline]
    pub fn leaf(aabb: Aabb, start: usize, count: usize) -> Self {
        Self {
            aabb,
            first: -(start as i32) - 1,
            second: count as i32,
        }
    }

    /// Creates an internal node with the given children.
    #[inline]
    pub fn internal(aabb: Aabb, left: u32, right: u32) -> Self {
        Self {
            aabb,
            first: left as i32,
            second: right as i32,
        }
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first < 0
    }

    /// The primitive slots covered by this node, if it is a leaf.
    #[inline]
    pub fn leaf_range(&self) -> Option<Range<usize>> {
        if self.is_leaf() {
            let start = (-(self.first as i64) - 1) as usize;
            Some(start..start + self.second.max(0) as usize)
        } else {
            None
        }
    }

    /// The left and right children of this node, if it is internal.
    ///
    /// A missing child is `None`.
    #[inline]
    pub fn children(&self) -> Option<[Option<u32>; 2]> {
        if self.is_leaf() {
            None
        } else {
            let child = |id: i32| if id > 0 { Some(id as u32) } else { None };
            Some([child(self.first), child(self.second)])
        }
    }
}

/// A primitive stored in a [`KdTree`], identified by its vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KdPrimitive {
    /// A point.
    Point(u32),
    /// A line segment.
    Line(u32, u32),
    /// A triangle.
    Triangle(u32, u32, u32),
}

impl KdPrimitive {
    /// The number of vertices of this primitive.
    pub fn num_vertices(&self) -> usize {
        match self {
            KdPrimitive::Point(..) => 1,
            KdPrimitive::Line(..) => 2,
            KdPrimitive::Triangle(..) => 3,
        }
    }

    /// Calls `f` on each vertex index of this primitive, in order.
    pub fn for_each_vertex(&self, mut f: impl FnMut(u32)) {
        match *self {
            KdPrimitive::Point(i0) => f(i0),
            KdPrimitive::Line(i0, i1) => {
                f(i0);
                f(i1);
            }
            KdPrimitive::Triangle(i0, i1, i2) => {
                f(i0);
                f(i1);
                f(i2);
            }
        }
    }
}

/// A flattened K-d tree over the points, lines and triangles of a
/// [`Geometry`](crate::shape::Geometry).
///
/// All nodes live in a single array. Leaves reference contiguous ranges of
/// [`KdTree::primitive_indices`], each entry being the offset of a packed primitive in
/// [`KdTree::vertex_indices`]. A packed primitive is encoded as `[count, v0, (v1), (v2)]`
/// where `count` is 1 for points, 2 for lines and 3 for triangles.
///
/// Once built, a tree is immutable: any number of queries can run on it concurrently.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KdTree {
    pub(super) nodes: Vec<KdNode>,
    pub(super) primitive_indices: Vec<u32>,
    pub(super) vertex_indices: Vec<u32>,
    pub(super) vertices: Arc<[Point<Real>]>,
}

impl Default for KdTree {
    fn default() -> Self {
        Self::new()
    }
}

impl KdTree {
    /// Creates an empty tree.
    ///
    /// Use [`KdTree::build`] to populate it.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            primitive_indices: Vec::new(),
            vertex_indices: Vec::new(),
            vertices: Arc::from(Vec::new()),
        }
    }

    /// Creates a tree from its raw buffers, without checking their consistency.
    ///
    /// Malformed packed primitives are reported and skipped at traversal time.
    pub fn from_raw_parts(
        nodes: Vec<KdNode>,
        primitive_indices: Vec<u32>,
        vertex_indices: Vec<u32>,
        vertices: Arc<[Point<Real>]>,
    ) -> Self {
        Self {
            nodes,
            primitive_indices,
            vertex_indices,
            vertices,
        }
    }

    /// Removes all the nodes and primitives of this tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.primitive_indices.clear();
        self.vertex_indices.clear();
        self.vertices = Arc::from(Vec::new());
    }

    /// Does this tree contain no node at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes of this tree. The root, if any, is at index 0.
    #[inline]
    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    /// The root node of this tree.
    #[inline]
    pub fn root(&self) -> Option<&KdNode> {
        self.nodes.first()
    }

    /// The bounding box of the whole tree.
    #[inline]
    pub fn root_aabb(&self) -> Option<&Aabb> {
        self.root().map(|root| &root.aabb)
    }

    /// For each primitive slot, the offset of the packed primitive in
    /// [`KdTree::vertex_indices`].
    #[inline]
    pub fn primitive_indices(&self) -> &[u32] {
        &self.primitive_indices
    }

    /// The packed `[count, v0, (v1), (v2)]` vertex indices of every primitive.
    #[inline]
    pub fn vertex_indices(&self) -> &[u32] {
        &self.vertex_indices
    }

    /// The vertex buffer shared with the geometry this tree was built from.
    #[inline]
    pub fn vertices(&self) -> &Arc<[Point<Real>]> {
        &self.vertices
    }

    /// The number of primitives indexed by this tree.
    #[inline]
    pub fn num_primitives(&self) -> usize {
        self.primitive_indices.len()
    }

    /// The vertex indices of the primitive at the given slot.
    ///
    /// Returns `None` if the slot, or the packed primitive it refers to, is out of bounds.
    /// The returned slice has the length encoded in the packed primitive, which is not
    /// necessarily 1, 2 or 3 for trees created with [`KdTree::from_raw_parts`].
    #[inline]
    pub fn primitive_vertex_indices(&self, slot: usize) -> Option<&[u32]> {
        let offset = *self.primitive_indices.get(slot)? as usize;
        let count = *self.vertex_indices.get(offset)? as usize;
        self.vertex_indices.get(offset + 1..offset + 1 + count)
    }

    /// The primitive at the given slot, if it is a well-formed point, line or triangle.
    #[inline]
    pub fn primitive(&self, slot: usize) -> Option<KdPrimitive> {
        match *self.primitive_vertex_indices(slot)? {
            [v0] => Some(KdPrimitive::Point(v0)),
            [v0, v1] => Some(KdPrimitive::Line(v0, v1)),
            [v0, v1, v2] => Some(KdPrimitive::Triangle(v0, v1, v2)),
            _ => None,
        }
    }

    /// Appends a packed point, recording its offset as a new primitive slot.
    pub(super) fn add_point(&mut self, p0: u32) {
        self.primitive_indices.push(self.vertex_indices.len() as u32);
        self.vertex_indices.extend_from_slice(&[1, p0]);
    }

    pub(super) fn add_line(&mut self, p0: u32, p1: u32) {
        self.primitive_indices.push(self.vertex_indices.len() as u32);
        self.vertex_indices.extend_from_slice(&[2, p0, p1]);
    }

    pub(super) fn add_triangle(&mut self, p0: u32, p1: u32, p2: u32) {
        self.primitive_indices.push(self.vertex_indices.len() as u32);
        self.vertex_indices.extend_from_slice(&[3, p0, p1, p2]);
    }

    /// Appends a node and returns its index.
    pub(super) fn add_node(&mut self, node: KdNode) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }
}
