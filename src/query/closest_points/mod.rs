//! Implementation details of the closest points computation between segments and points.

pub use self::closest_points_segment_point::closest_points_segment_point_parameter;
pub use self::closest_points_segment_segment::closest_points_segment_segment_parameters;

mod closest_points_segment_point;
mod closest_points_segment_segment;
