use super::{KdNode, KdTree, KD_TREE_LEAF_EPSILON};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::shape::{Geometry, PrimitiveIndexVisitor};
use alloc::vec::Vec;
use core::ops::Range;

/// Parameters controlling the construction of a [`KdTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KdTreeBuildOptions {
    /// A node is not subdivided further once it contains at most this many primitives.
    ///
    /// A geometry with fewer vertices than this number is not indexed at all. A value of `0`
    /// behaves like `1`.
    pub target_num_triangles_per_leaf: usize,
    /// The maximum depth of the tree. The root has depth `0`.
    pub max_num_levels: usize,
}

impl Default for KdTreeBuildOptions {
    fn default() -> Self {
        Self {
            target_num_triangles_per_leaf: 50,
            max_num_levels: 20,
        }
    }
}

impl KdTreeBuildOptions {
    /// Sets the number of primitives below which a node stops being subdivided.
    pub fn with_target_num_triangles_per_leaf(mut self, target: usize) -> Self {
        self.target_num_triangles_per_leaf = target;
        self
    }

    /// Sets the maximum depth of the tree.
    pub fn with_max_num_levels(mut self, max_num_levels: usize) -> Self {
        self.max_num_levels = max_num_levels;
        self
    }

    fn target(&self) -> usize {
        self.target_num_triangles_per_leaf.max(1)
    }
}

/// Reason why a [`KdTree`] could not be built from a geometry.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum KdTreeBuildError {
    /// The geometry does not have any vertex buffer.
    #[error("the geometry has no vertex attribute")]
    MissingVertices,
    /// The geometry has fewer vertices than the targeted number of primitives per leaf.
    #[error("the geometry has {num_vertices} vertices, fewer than the {target} primitives targeted per leaf")]
    NotEnoughVertices {
        /// The number of vertices of the geometry.
        num_vertices: usize,
        /// The targeted number of primitives per leaf.
        target: usize,
    },
    /// A primitive references a vertex that does not exist.
    #[error("the vertex index {index} is out of bounds (the geometry has {num_vertices} vertices)")]
    VertexIndexOutOfBounds {
        /// The offending vertex index.
        index: u32,
        /// The number of vertices of the geometry.
        num_vertices: usize,
    },
}

/// Counting pass sizing the packed vertex-index buffer.
#[derive(Default)]
struct InfoCollector {
    num_vertex_indices: usize,
    max_vertex_index: Option<u32>,
}

impl InfoCollector {
    fn take_index(&mut self, i: u32) {
        self.max_vertex_index = Some(self.max_vertex_index.map_or(i, |m| m.max(i)));
    }
}

impl PrimitiveIndexVisitor for InfoCollector {
    fn point(&mut self, i0: u32) {
        self.num_vertex_indices += 2;
        self.take_index(i0);
    }

    fn line(&mut self, i0: u32, i1: u32) {
        self.num_vertex_indices += 3;
        self.take_index(i0);
        self.take_index(i1);
    }

    fn triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.num_vertex_indices += 4;
        self.take_index(i0);
        self.take_index(i1);
        self.take_index(i2);
    }
}

/// Records every non-degenerate primitive into the tree's buffers, together with its centroid.
struct PrimitiveCollector<'a> {
    tree: &'a mut KdTree,
    vertices: &'a [Point<Real>],
    centers: Vec<Point<Real>>,
}

impl PrimitiveCollector<'_> {
    fn push_center(&mut self, indices: &[u32]) {
        let aabb = Aabb::from_points(indices.iter().map(|i| self.vertices[*i as usize]));
        self.centers.push(aabb.center());
    }
}

impl PrimitiveIndexVisitor for PrimitiveCollector<'_> {
    fn point(&mut self, i0: u32) {
        self.tree.add_point(i0);
        self.centers.push(self.vertices[i0 as usize]);
    }

    fn line(&mut self, i0: u32, i1: u32) {
        if i0 == i1 {
            return;
        }

        self.tree.add_line(i0, i1);
        self.push_center(&[i0, i1]);
    }

    fn triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        if i0 == i1 || i1 == i2 || i0 == i2 {
            return;
        }

        self.tree.add_triangle(i0, i1, i2);
        self.push_center(&[i0, i1, i2]);
    }
}

/// Ranks the axes of `aabb` from its longest extent to its shortest one.
fn compute_axis_order(aabb: &Aabb) -> [usize; 3] {
    let extents = aabb.extents();
    let (dx, dy, dz) = (extents.x, extents.y, extents.z);

    let longest = if dx >= dy && dx >= dz {
        0
    } else if dy >= dz {
        1
    } else {
        2
    };
    let shortest = if dx < dy && dx < dz {
        0
    } else if dy < dz {
        1
    } else {
        2
    };
    let middle = match longest + shortest {
        3 => 0,
        2 => 1,
        _ => 2,
    };

    [longest, middle, shortest]
}

/// State of the recursive subdivision of a freshly collected tree.
struct KdTreeDivision<'a> {
    tree: &'a mut KdTree,
    centers: &'a [Point<Real>],
    /// Permutation of the local primitive indices. Each leaf covers a contiguous range of it.
    primitives: &'a mut [u32],
    axis_order: [usize; 3],
    target: usize,
    max_num_levels: usize,
}

impl KdTreeDivision<'_> {
    fn divide(&mut self, node_id: u32, bb: &mut Aabb, level: usize) {
        let node = self.tree.nodes[node_id as usize];
        let Some(range) = node.leaf_range() else {
            return;
        };

        if level >= self.max_num_levels || range.len() <= self.target {
            self.compute_node_box(node_id, range);
            return;
        }

        let axis = self.axis_order[level % 3];
        let mid = (bb.mins[axis] + bb.maxs[axis]) * 0.5;
        let (istart, iend) = (range.start as isize, range.end as isize - 1);

        // Hoare partition on the centroids: `<= mid` to the left, `> mid` to the right.
        let centers = self.centers;
        let key = |primitive: u32| centers[primitive as usize][axis];
        let prims = &mut *self.primitives;
        let mut left = istart;
        let mut right = iend;

        while left < right {
            while left < right && key(prims[left as usize]) <= mid {
                left += 1;
            }

            while left < right && key(prims[right as usize]) > mid {
                right -= 1;
            }

            if left < right {
                prims.swap(left as usize, right as usize);
                left += 1;
                right -= 1;
            }
        }

        if left == right {
            if key(prims[left as usize]) <= mid {
                left += 1;
            } else {
                right -= 1;
            }
        }

        // When every primitive lies on the same side, the node itself is divided again with
        // the clamped box instead of creating a single child.
        let (left_child, right_child, in_situ) = if right < istart {
            (None, Some(node_id), true)
        } else if left > iend {
            (Some(node_id), None, true)
        } else {
            let left_start = istart as usize;
            let right_start = left as usize;
            let left_child = self.tree.add_node(KdNode::leaf(
                *bb,
                left_start,
                (right - istart + 1) as usize,
            ));
            let right_child = self.tree.add_node(KdNode::leaf(
                *bb,
                right_start,
                (iend - left + 1) as usize,
            ));
            (Some(left_child), Some(right_child), false)
        };

        if let Some(left_child) = left_child {
            let restore = bb.maxs[axis];
            bb.maxs[axis] = mid;
            self.divide(left_child, bb, level + 1);
            bb.maxs[axis] = restore;
        }

        if let Some(right_child) = right_child {
            let restore = bb.mins[axis];
            bb.mins[axis] = mid;
            self.divide(right_child, bb, level + 1);
            bb.mins[axis] = restore;
        }

        if let (false, Some(left_child), Some(right_child)) = (in_situ, left_child, right_child) {
            let aabb = self.tree.nodes[left_child as usize]
                .aabb
                .merged(&self.tree.nodes[right_child as usize].aabb);
            self.tree.nodes[node_id as usize] = KdNode::internal(aabb, left_child, right_child);
        }
    }

    /// Sets the box of a leaf to the loosened bounds of its primitives' vertices.
    ///
    /// An empty leaf keeps its current box.
    fn compute_node_box(&mut self, node_id: u32, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        let tree = &mut *self.tree;
        let mut aabb = Aabb::new_invalid();

        for local in &self.primitives[range] {
            let offset = tree.primitive_indices[*local as usize] as usize;
            let count = tree.vertex_indices[offset] as usize;

            for vid in &tree.vertex_indices[offset + 1..offset + 1 + count] {
                aabb.take_point(tree.vertices[*vid as usize]);
            }
        }

        aabb.loosen(KD_TREE_LEAF_EPSILON);
        tree.nodes[node_id as usize].aabb = aabb;
    }
}

impl KdTree {
    /// Builds this tree from the primitives of `geometry`, replacing its previous content.
    ///
    /// Returns `true` if the tree contains at least one node afterwards. Any failure (see
    /// [`KdTreeBuildError`]) leaves the tree empty and returns `false`; use
    /// [`KdTree::try_build`] to know why the build failed.
    pub fn build(&mut self, options: &KdTreeBuildOptions, geometry: &Geometry) -> bool {
        match self.try_build(options, geometry) {
            Ok(()) => !self.nodes.is_empty(),
            Err(err) => {
                log::debug!("KdTree build skipped: {}", err);
                false
            }
        }
    }

    /// Builds this tree from the primitives of `geometry`, replacing its previous content.
    ///
    /// Primitives with repeated vertex indices are excluded from the tree.
    pub fn try_build(
        &mut self,
        options: &KdTreeBuildOptions,
        geometry: &Geometry,
    ) -> Result<(), KdTreeBuildError> {
        self.clear();

        let vertices = geometry
            .vertices()
            .ok_or(KdTreeBuildError::MissingVertices)?;
        let target = options.target();

        if vertices.len() < target {
            return Err(KdTreeBuildError::NotEnoughVertices {
                num_vertices: vertices.len(),
                target,
            });
        }

        let mut info = InfoCollector::default();
        geometry.for_each_primitive(&mut info);

        if let Some(index) = info.max_vertex_index {
            if index as usize >= vertices.len() {
                return Err(KdTreeBuildError::VertexIndexOutOfBounds {
                    index,
                    num_vertices: vertices.len(),
                });
            }
        }

        let estimated_num_primitives: usize = geometry
            .primitive_sets()
            .iter()
            .map(|set| set.num_primitives_upper_bound())
            .sum();

        self.vertices = vertices.clone();
        self.primitive_indices.reserve_exact(estimated_num_primitives);
        self.vertex_indices.reserve_exact(info.num_vertex_indices);

        let mut collector = PrimitiveCollector {
            tree: self,
            vertices: &vertices[..],
            centers: Vec::with_capacity(estimated_num_primitives),
        };
        geometry.for_each_primitive(&mut collector);
        let centers = collector.centers;

        self.primitive_indices.shrink_to_fit();
        self.vertex_indices.shrink_to_fit();

        let num_primitives = self.primitive_indices.len();
        let mut primitives: Vec<u32> = (0..num_primitives as u32).collect();
        let mut bb = *geometry.aabb();
        let root = self.add_node(KdNode::leaf(bb, 0, num_primitives));

        let mut division = KdTreeDivision {
            tree: self,
            centers: &centers,
            primitives: &mut primitives,
            axis_order: compute_axis_order(&bb),
            target,
            max_num_levels: options.max_num_levels,
        };
        division.divide(root, &mut bb, 0);

        // Leaves now reference their primitives directly by packed offset.
        for primitive in &mut primitives {
            *primitive = self.primitive_indices[*primitive as usize];
        }
        self.primitive_indices = primitives;
        self.nodes.shrink_to_fit();

        log::debug!(
            "Built KdTree: {} nodes, {} primitives, depth {}.",
            self.nodes.len(),
            self.primitive_indices.len(),
            self.depth()
        );

        Ok(())
    }
}

/// Builds K-d trees for many geometries with the same options.
#[derive(Clone, Debug, Default)]
pub struct KdTreeBuilder {
    /// The options used for every build.
    pub options: KdTreeBuildOptions,
    num_vertices_processed: usize,
}

impl KdTreeBuilder {
    /// Creates a builder using the given options.
    pub fn new(options: KdTreeBuildOptions) -> Self {
        Self {
            options,
            num_vertices_processed: 0,
        }
    }

    /// The total number of vertices of the geometries successfully indexed so far.
    pub fn num_vertices_processed(&self) -> usize {
        self.num_vertices_processed
    }

    /// Builds a tree for `geometry`, or returns `None` if it cannot be indexed.
    pub fn build(&mut self, geometry: &Geometry) -> Option<KdTree> {
        let mut tree = KdTree::new();

        if tree.build(&self.options, geometry) {
            self.num_vertices_processed += geometry.num_vertices();
            Some(tree)
        } else {
            None
        }
    }

    /// Builds a tree for each geometry, in order.
    pub fn build_all(&mut self, geometries: &[Geometry]) -> Vec<Option<KdTree>> {
        geometries
            .iter()
            .map(|geometry| self.build(geometry))
            .collect()
    }
}
