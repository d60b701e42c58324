use kdtree3d::partitioning::{KdPrimitive, KdTree, KdTreeBuildOptions};
use kdtree3d::query::visitors::KdTreeRayIntersector;
use kdtree3d::shape::{Geometry, PrimitiveMode, PrimitiveSet};
use nalgebra::Point3;

fn polyline_and_points() -> Geometry {
    let mut vertices: Vec<_> = (0..10).map(|i| Point3::new(i as f32, 0.0, 0.0)).collect();
    vertices.extend((0..10).map(|i| Point3::new(i as f32, 5.0, 0.0)));

    Geometry::new(
        vertices,
        vec![
            PrimitiveSet::draw_arrays(PrimitiveMode::LineStrip, 0, 10),
            PrimitiveSet::draw_arrays(PrimitiveMode::Points, 10, 10),
        ],
    )
}

fn build() -> KdTree {
    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(2);
    let mut tree = KdTree::new();
    assert!(tree.build(&options, &polyline_and_points()));
    tree.assert_well_formed();
    assert_eq!(tree.num_primitives(), 19);
    tree
}

#[test]
fn lines_are_picked_within_threshold() {
    let tree = build();
    let start = Point3::new(2.5, 0.005, -1.0);
    let end = Point3::new(2.5, 0.005, 1.0);

    let mut intersector = KdTreeRayIntersector::new(start, end);
    tree.intersect_line_segment(&mut intersector, &start, &end);
    assert!(intersector.hits().is_empty());

    let mut intersector = KdTreeRayIntersector::new(start, end).with_threshold(0.01);
    tree.intersect_line_segment(&mut intersector, &start, &end);
    let hits = intersector.into_sorted_hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].vertices, KdPrimitive::Line(2, 3));
    approx::assert_relative_eq!(hits[0].time_of_impact, 0.5);
}

#[test]
fn points_are_picked_within_threshold() {
    let tree = build();
    let start = Point3::new(7.02, 5.0, 3.0);
    let end = Point3::new(7.02, 5.0, -3.0);

    let mut intersector = KdTreeRayIntersector::new(start, end).with_threshold(0.05);
    tree.intersect_line_segment(&mut intersector, &start, &end);
    let hits = intersector.into_sorted_hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].vertices, KdPrimitive::Point(17));
    approx::assert_relative_eq!(hits[0].time_of_impact, 0.5);
}
