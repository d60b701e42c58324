use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::{PrimitiveIndexVisitor, PrimitiveSet};
use alloc::sync::Arc;
use alloc::vec::Vec;

/// A piece of geometry: a vertex buffer, its bounding box, and an ordered list of
/// primitive sets referencing the vertices.
///
/// This is the input of [`KdTree::build`](crate::partitioning::KdTree::build). The vertex
/// buffer is shared with the trees built from this geometry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Geometry {
    vertices: Option<Arc<[Point<Real>]>>,
    primitive_sets: Vec<PrimitiveSet>,
    aabb: Aabb,
}

impl Geometry {
    /// Creates a geometry from its vertices and primitive sets.
    ///
    /// The bounding box of the geometry is computed from all its vertices.
    pub fn new(vertices: Vec<Point<Real>>, primitive_sets: Vec<PrimitiveSet>) -> Self {
        let aabb = Aabb::from_points(vertices.iter().copied());
        Self {
            vertices: Some(vertices.into()),
            primitive_sets,
            aabb,
        }
    }

    /// Creates a geometry without any vertex attribute.
    ///
    /// No spatial index can be built for such a geometry.
    pub fn without_vertices(primitive_sets: Vec<PrimitiveSet>) -> Self {
        Self {
            vertices: None,
            primitive_sets,
            aabb: Aabb::new_invalid(),
        }
    }

    /// Replaces the bounding box of this geometry.
    ///
    /// The K-d tree built from this geometry derives its splitting-axis order and its
    /// spatial subdivision from this bounding box.
    pub fn with_aabb(mut self, aabb: Aabb) -> Self {
        self.aabb = aabb;
        self
    }

    /// The vertex buffer of this geometry, if it has one.
    #[inline]
    pub fn vertices(&self) -> Option<&Arc<[Point<Real>]>> {
        self.vertices.as_ref()
    }

    /// The number of vertices of this geometry.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.as_ref().map(|v| v.len()).unwrap_or(0)
    }

    /// The primitive sets of this geometry.
    #[inline]
    pub fn primitive_sets(&self) -> &[PrimitiveSet] {
        &self.primitive_sets
    }

    /// The bounding box of this geometry.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Expands every primitive set of this geometry, in order, into points, lines and
    /// triangles given to `visitor`.
    pub fn for_each_primitive(&self, visitor: &mut impl PrimitiveIndexVisitor) {
        for primitive_set in &self.primitive_sets {
            primitive_set.for_each_primitive(visitor);
        }
    }
}
