use crate::math::{Point, Real};

/// Volumes that can be grown to enclose other volumes.
///
/// The nodes of a [`KdTree`](crate::partitioning::KdTree) are bounded by such volumes: a
/// leaf volume is enlarged by a small margin, and an internal volume is the merge of the
/// volumes of its children.
pub trait BoundingVolume {
    /// The center of this volume.
    fn center(&self) -> Point<Real>;

    /// Enlarges this volume in-place so it also encloses `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest volume enclosing both `self` and `other`.
    fn merged(&self, other: &Self) -> Self;

    /// Moves every face of this volume outward by `amount`.
    fn loosen(&mut self, amount: Real);

    /// A copy of this volume with every face moved outward by `amount`.
    fn loosened(&self, amount: Real) -> Self;
}
