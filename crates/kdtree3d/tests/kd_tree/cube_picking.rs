use crate::brute_force_triangle_hits;
use kdtree3d::partitioning::{KdTree, KdTreeBuildOptions};
use kdtree3d::query::visitors::KdTreeRayIntersector;
use kdtree3d::shape::{Geometry, PrimitiveMode, PrimitiveSet};
use nalgebra::Point3;

fn cube() -> Geometry {
    let vertices = vec![
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, 1.0),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 0, 3, 2, // z = -1
        4, 5, 6, 4, 6, 7, // z = 1
        0, 1, 5, 0, 5, 4, // y = -1
        3, 7, 6, 3, 6, 2, // y = 1
        0, 4, 7, 0, 7, 3, // x = -1
        1, 2, 6, 1, 6, 5, // x = 1
    ];

    Geometry::new(
        vertices,
        vec![PrimitiveSet::draw_elements(PrimitiveMode::Triangles, indices)],
    )
}

fn build_cube_tree() -> KdTree {
    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(1);
    let mut tree = KdTree::new();
    assert!(tree.build(&options, &cube()));
    tree.assert_well_formed();
    assert_eq!(tree.num_primitives(), 12);
    tree
}

fn pick(tree: &KdTree, start: Point3<f32>, end: Point3<f32>) -> KdTreeRayIntersector {
    let mut intersector = KdTreeRayIntersector::new(start, end);
    tree.intersect_line_segment(&mut intersector, &start, &end);
    intersector
}

#[test]
fn cube_segment_off_diagonals_hits_two_faces() {
    let tree = build_cube_tree();
    let start = Point3::new(0.3, -0.6, -5.0);
    let end = Point3::new(0.3, -0.6, 5.0);

    let hits = pick(&tree, start, end).into_sorted_hits();
    assert_eq!(hits.len(), 2);
    approx::assert_relative_eq!(hits[0].time_of_impact, 0.4);
    approx::assert_relative_eq!(hits[1].time_of_impact, 0.6);
    approx::assert_relative_eq!(hits[0].point, Point3::new(0.3, -0.6, -1.0));
    approx::assert_relative_eq!(hits[0].normal.unwrap(), -nalgebra::Vector3::z());
}

#[test]
fn cube_segment_through_center_matches_brute_force() {
    let tree = build_cube_tree();
    let start = Point3::new(0.0, 0.0, -5.0);
    let end = Point3::new(0.0, 0.0, 5.0);

    let hits = pick(&tree, start, end).into_sorted_hits();
    let mut slots: Vec<_> = hits.iter().map(|hit| hit.primitive).collect();
    slots.sort_unstable();
    slots.dedup();
    assert_eq!(slots, brute_force_triangle_hits(&tree, &start, &end));

    // The segment crosses the diagonals of both faces, which may report both triangles of
    // each face at the same location.
    let mut tois: Vec<_> = hits.iter().map(|hit| hit.time_of_impact).collect();
    tois.dedup_by(|a, b| approx::relative_eq!(*a, *b));
    assert_eq!(tois.len(), 2);
    approx::assert_relative_eq!(tois[0], 0.4);
    approx::assert_relative_eq!(tois[1], 0.6);
}

#[test]
fn cube_segment_stopping_inside_hits_one_face() {
    let tree = build_cube_tree();
    let start = Point3::new(-5.0, 0.2, 0.7);
    let end = Point3::new(0.0, 0.2, 0.7);
    let hits = pick(&tree, start, end).into_sorted_hits();

    assert_eq!(hits.len(), 1);
    approx::assert_relative_eq!(hits[0].point, Point3::new(-1.0, 0.2, 0.7));
}

#[test]
fn cube_segment_missing_the_cube() {
    let tree = build_cube_tree();
    let intersector = pick(&tree, Point3::new(-5.0, 2.0, 0.0), Point3::new(5.0, 2.0, 0.0));
    assert!(intersector.hits().is_empty());
}
