/*!
kdtree3d
========

**kdtree3d** is a flattened K-d tree built over the points, line segments and
triangles of a piece of 3-dimensional geometry. It accelerates ray and segment
queries such as picking, line-of-sight and occlusion tests.

The tree is stored as a single array of nodes plus three parallel buffers (primitive
indices, packed vertex indices and vertex positions). Queries are performed by
traversing the tree with a user-provided [`partitioning::KdTreeVisitor`].

```rust
# #[cfg(feature = "f32")] {
use kdtree3d::partitioning::{KdTree, KdTreeBuildOptions};
use kdtree3d::query::visitors::KdTreeRayIntersector;
use kdtree3d::shape::{Geometry, PrimitiveMode, PrimitiveSet};
use nalgebra::Point3;

let vertices = vec![
    Point3::new(0.0, 0.0, 0.0),
    Point3::new(1.0, 0.0, 0.0),
    Point3::new(0.0, 1.0, 0.0),
];
let geometry = Geometry::new(
    vertices,
    vec![PrimitiveSet::draw_arrays(PrimitiveMode::Triangles, 0, 3)],
);

let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(1);
let mut tree = KdTree::new();
assert!(tree.build(&options, &geometry));

let start = Point3::new(0.25, 0.25, -1.0);
let end = Point3::new(0.25, 0.25, 1.0);
let mut intersector = KdTreeRayIntersector::new(start, end);
tree.intersect_line_segment(&mut intersector, &start, &end);
assert_eq!(intersector.hits().len(), 1);
# }
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_qualifications)]

#[cfg(all(feature = "f32", feature = "f64"))]
core::compile_error!("The `f32` and `f64` features are mutually exclusive.");

extern crate alloc;

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;
pub mod query;
pub mod shape;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;
}
