//! Visitors for performing geometric queries exploiting spatial partitioning data structures.

pub use self::kd_tree_ray_intersector::{KdTreeHit, KdTreeRayIntersector};

mod kd_tree_ray_intersector;
