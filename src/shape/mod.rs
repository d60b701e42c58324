//! Geometry given as input to the spatial index.

pub use self::geometry::Geometry;
pub use self::primitive_set::{PrimitiveIndexVisitor, PrimitiveMode, PrimitiveSet};

mod geometry;
mod primitive_set;
