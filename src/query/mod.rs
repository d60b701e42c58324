//! Non-persistent geometric queries.
//!
//! Segments are intersected with the primitives of a [`KdTree`](crate::partitioning::KdTree)
//! through the visitors of the [`visitors`] module. The lower-level routines they rely on
//! (ray/triangle intersection, AABB clipping, closest points between segments and points)
//! are exported too.

pub use self::clip::clip_aabb_line;
pub use self::ray::{local_ray_intersection_with_triangle, Ray, RayIntersection};

mod clip;
pub mod closest_points;
mod ray;
pub mod visitors;
