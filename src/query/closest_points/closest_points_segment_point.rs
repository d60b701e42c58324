use crate::math::{Point, Real, DEFAULT_EPSILON};

/// Parameter of the point of the segment `[a, b]` closest to `pt`.
///
/// The returned parameter `t` is in `[0, 1]` and the closest point is `a + (b - a) * t`.
#[inline]
pub fn closest_points_segment_point_parameter(
    a: &Point<Real>,
    b: &Point<Real>,
    pt: &Point<Real>,
) -> Real {
    let ab = b - a;
    let sqnab = ab.norm_squared();

    if sqnab <= DEFAULT_EPSILON {
        0.0
    } else {
        na::clamp(ab.dot(&(pt - a)) / sqnab, 0.0, 1.0)
    }
}
