use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use crate::partitioning::{KdPrimitive, KdTreeVisitor};
use crate::query::closest_points::{
    closest_points_segment_point_parameter, closest_points_segment_segment_parameters,
};
use crate::query::{local_ray_intersection_with_triangle, Ray};
use alloc::vec::Vec;
use na::Vector3;
use ordered_float::OrderedFloat;

/// An intersection found by a [`KdTreeRayIntersector`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KdTreeHit {
    /// Parameter of the hit along the queried segment: `0` at its start, `1` at its end.
    pub time_of_impact: Real,
    /// The slot of the primitive hit.
    ///
    /// See [`KdTree::primitive_indices`](crate::partitioning::KdTree::primitive_indices).
    pub primitive: usize,
    /// The vertex indices of the primitive hit.
    pub vertices: KdPrimitive,
    /// The barycentric coordinates of the hit point relative to the vertices of the primitive.
    ///
    /// Coordinates of missing vertices (for lines and points) are zero.
    pub barycentric: Vector3<Real>,
    /// The point of the queried segment where the hit occurred.
    pub point: Point<Real>,
    /// The normal of the triangle hit, pointing toward the segment's start.
    ///
    /// This is `None` for lines and points.
    pub normal: Option<Vector<Real>>,
}

/// A [`KdTreeVisitor`] collecting the intersections between a segment and the primitives
/// of a [`KdTree`](crate::partitioning::KdTree).
///
/// Triangles are hit when the segment crosses them (from either side). Lines and points are
/// hit when they are at a distance smaller than [`Self::threshold`] from the segment, and
/// are ignored when that threshold is zero.
#[derive(Clone, Debug)]
pub struct KdTreeRayIntersector {
    start: Point<Real>,
    end: Point<Real>,
    threshold: Real,
    hits: Vec<KdTreeHit>,
}

impl KdTreeRayIntersector {
    /// Creates an intersector for the segment `[start, end]`.
    pub fn new(start: Point<Real>, end: Point<Real>) -> Self {
        Self {
            start,
            end,
            threshold: 0.0,
            hits: Vec::new(),
        }
    }

    /// Sets the distance below which lines and points are considered hit.
    pub fn with_threshold(mut self, threshold: Real) -> Self {
        self.threshold = threshold.max(0.0);
        self
    }

    /// The distance below which lines and points are considered hit.
    pub fn threshold(&self) -> Real {
        self.threshold
    }

    /// The start of the queried segment.
    pub fn start(&self) -> &Point<Real> {
        &self.start
    }

    /// The end of the queried segment.
    pub fn end(&self) -> &Point<Real> {
        &self.end
    }

    /// The hits found so far, in traversal order.
    pub fn hits(&self) -> &[KdTreeHit] {
        &self.hits
    }

    /// Removes all the hits found so far.
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    /// The hits found, sorted by increasing time of impact.
    pub fn into_sorted_hits(mut self) -> Vec<KdTreeHit> {
        self.hits.sort_by_key(|hit| OrderedFloat(hit.time_of_impact));
        self.hits
    }

    fn segment_point(&self, t: Real) -> Point<Real> {
        self.start + (self.end - self.start) * t
    }
}

impl KdTreeVisitor for KdTreeRayIntersector {
    fn enter(&mut self, aabb: &Aabb) -> bool {
        aabb.loosened(self.threshold)
            .clip_segment_parameters(&self.start, &self.end)
            .is_some()
    }

    fn enter_segment(
        &mut self,
        aabb: &Aabb,
        start: &mut Point<Real>,
        end: &mut Point<Real>,
    ) -> bool {
        match aabb.loosened(self.threshold).clip_segment(start, end) {
            Some((clipped_start, clipped_end)) => {
                *start = clipped_start;
                *end = clipped_end;
                true
            }
            None => false,
        }
    }

    fn intersect_point(&mut self, vertices: &[Point<Real>], primitive: usize, v0: u32) {
        if self.threshold <= 0.0 {
            return;
        }

        let Some(pt) = vertices.get(v0 as usize) else {
            return;
        };
        let t = closest_points_segment_point_parameter(&self.start, &self.end, pt);
        let point = self.segment_point(t);

        if na::distance(&point, pt) <= self.threshold {
            self.hits.push(KdTreeHit {
                time_of_impact: t,
                primitive,
                vertices: KdPrimitive::Point(v0),
                barycentric: Vector3::x(),
                point,
                normal: None,
            });
        }
    }

    fn intersect_line(&mut self, vertices: &[Point<Real>], primitive: usize, v0: u32, v1: u32) {
        if self.threshold <= 0.0 {
            return;
        }

        let (Some(a), Some(b)) = (vertices.get(v0 as usize), vertices.get(v1 as usize)) else {
            return;
        };
        let (s, t) = closest_points_segment_segment_parameters((&self.start, &self.end), (a, b));
        let point = self.segment_point(s);
        let on_line = a + (b - a) * t;

        if na::distance(&point, &on_line) <= self.threshold {
            self.hits.push(KdTreeHit {
                time_of_impact: s,
                primitive,
                vertices: KdPrimitive::Line(v0, v1),
                barycentric: Vector3::new(1.0 - t, t, 0.0),
                point,
                normal: None,
            });
        }
    }

    fn intersect_triangle(
        &mut self,
        vertices: &[Point<Real>],
        primitive: usize,
        v0: u32,
        v1: u32,
        v2: u32,
    ) {
        let (Some(a), Some(b), Some(c)) = (
            vertices.get(v0 as usize),
            vertices.get(v1 as usize),
            vertices.get(v2 as usize),
        ) else {
            return;
        };

        let ray = Ray::from_segment(&self.start, &self.end);

        if let Some((inter, barycentric)) = local_ray_intersection_with_triangle(a, b, c, &ray) {
            if inter.time_of_impact <= 1.0 {
                self.hits.push(KdTreeHit {
                    time_of_impact: inter.time_of_impact,
                    primitive,
                    vertices: KdPrimitive::Triangle(v0, v1, v2),
                    barycentric,
                    point: ray.point_at(inter.time_of_impact),
                    normal: Some(inter.normal),
                });
            }
        }
    }
}
