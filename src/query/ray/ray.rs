//! Traits and structure needed to cast rays.

use crate::math::{Point, Real, Vector};

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at an origin point and extending
/// in a direction. Points along the ray are computed as `origin + dir * t`.
///
/// The direction does not need to be normalized. The segment queries of this crate
/// build rays with `dir = end - start` so that `t ∈ [0, 1]` spans the segment.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "f32")] {
/// use kdtree3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(5.0), Point3::new(5.0, 0.0, 0.0));
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction vector of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray from an origin point and direction vector.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Creates the ray starting at `start` such that `ray.point_at(1.0) == end`.
    pub fn from_segment(start: &Point<Real>, end: &Point<Real>) -> Ray {
        Ray::new(*start, end - start)
    }

    /// Computes a point along the ray at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Result of a successful ray cast against a shape.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The time of impact (parameter `t`) where the ray hits the shape.
    ///
    /// The exact hit point can be computed with `ray.point_at(time_of_impact)`.
    pub time_of_impact: Real,

    /// The surface normal at the intersection point.
    ///
    /// It points toward the side the ray comes from.
    pub normal: Vector<Real>,
}

impl RayIntersection {
    /// Creates a new `RayIntersection`.
    #[inline]
    pub fn new(time_of_impact: Real, normal: Vector<Real>) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            normal,
        }
    }
}
