use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use num::Zero;

impl Aabb {
    /// Computes the intersection of a segment with this AABB.
    ///
    /// Returns the endpoints of the part of the segment `[pa, pb]` lying inside of
    /// `self`, or `None` if there is no intersection.
    #[inline]
    pub fn clip_segment(
        &self,
        pa: &Point<Real>,
        pb: &Point<Real>,
    ) -> Option<(Point<Real>, Point<Real>)> {
        let ab = pb - pa;
        self.clip_segment_parameters(pa, pb)
            .map(|(t0, t1)| (pa + ab * t0, pa + ab * t1))
    }

    /// Computes the parameters of the part of the segment `[pa, pb]` lying inside of `self`.
    ///
    /// The parameters are in `[0, 1]` and such that the points are given by
    /// `pa + (pb - pa) * parameter`. Returns `None` if there is no intersection.
    #[inline]
    pub fn clip_segment_parameters(
        &self,
        pa: &Point<Real>,
        pb: &Point<Real>,
    ) -> Option<(Real, Real)> {
        let ab = pb - pa;
        clip_aabb_line(self, pa, &ab).and_then(|(tmin, tmax)| {
            let t0 = tmin.max(0.0);
            let t1 = tmax.min(1.0);

            if t0 > t1 {
                None
            } else {
                Some((t0, t1))
            }
        })
    }
}

/// Computes the parameters of the segment given by the intersection of a line and an AABB.
///
/// The line is `origin + dir * t` for all real `t`. If `dir` is zero on some axis, the
/// origin must lie within the AABB slab of that axis for an intersection to exist.
pub fn clip_aabb_line(
    aabb: &Aabb,
    origin: &Point<Real>,
    dir: &Vector<Real>,
) -> Option<(Real, Real)> {
    let mut tmax = Real::MAX;
    let mut tmin = -tmax;

    for i in 0usize..DIM {
        if dir[i].is_zero() {
            if origin[i] < aabb.mins[i] || origin[i] > aabb.maxs[i] {
                return None;
            }
        } else {
            let denom = 1.0 / dir[i];
            let mut inter_with_near_halfspace = (aabb.mins[i] - origin[i]) * denom;
            let mut inter_with_far_halfspace = (aabb.maxs[i] - origin[i]) * denom;

            if inter_with_near_halfspace > inter_with_far_halfspace {
                core::mem::swap(
                    &mut inter_with_near_halfspace,
                    &mut inter_with_far_halfspace,
                )
            }

            tmin = tmin.max(inter_with_near_halfspace);
            tmax = tmax.min(inter_with_far_halfspace);

            if tmin > tmax {
                return None;
            }
        }
    }

    Some((tmin, tmax))
}
