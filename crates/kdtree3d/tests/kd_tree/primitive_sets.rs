use crate::brute_force_triangle_hits;
use kdtree3d::partitioning::{KdPrimitive, KdTree, KdTreeBuildOptions};
use kdtree3d::query::visitors::KdTreeRayIntersector;
use kdtree3d::shape::{Geometry, PrimitiveMode, PrimitiveSet};
use nalgebra::Point3;

const GRID_SIZE: u32 = 12;

/// A height field made of one triangle strip per row of cells.
fn terrain() -> Geometry {
    let mut rng = oorandom::Rand32::new(1234);
    let mut vertices = Vec::new();

    for j in 0..=GRID_SIZE {
        for i in 0..=GRID_SIZE {
            vertices.push(Point3::new(i as f32, j as f32, rng.rand_float() * 0.5));
        }
    }

    let id = |i: u32, j: u32| j * (GRID_SIZE + 1) + i;
    let strips = (0..GRID_SIZE)
        .map(|j| {
            let indices = (0..=GRID_SIZE)
                .flat_map(|i| [id(i, j), id(i, j + 1)])
                .collect();
            PrimitiveSet::draw_elements(PrimitiveMode::TriangleStrip, indices)
        })
        .collect();

    Geometry::new(vertices, strips)
}

#[test]
fn terrain_strips_are_picked_once_per_cell() {
    let geometry = terrain();
    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(4);
    let mut tree = KdTree::new();
    assert!(tree.build(&options, &geometry));
    tree.assert_well_formed();
    assert_eq!(tree.num_primitives(), (GRID_SIZE * GRID_SIZE * 2) as usize);
    assert!(tree.depth() > 2);

    for j in 0..GRID_SIZE {
        for i in 0..GRID_SIZE {
            let start = Point3::new(i as f32 + 0.3, j as f32 + 0.6, 10.0);
            let end = Point3::new(i as f32 + 0.3, j as f32 + 0.6, -10.0);
            let mut intersector = KdTreeRayIntersector::new(start, end);
            tree.intersect_line_segment(&mut intersector, &start, &end);

            let hits = intersector.into_sorted_hits();
            assert_eq!(hits.len(), 1, "cell ({}, {})", i, j);
            assert_eq!(
                vec![hits[0].primitive],
                brute_force_triangle_hits(&tree, &start, &end)
            );
            assert!(hits[0].point.z >= 0.0 && hits[0].point.z <= 0.5);

            // The hit triangle belongs to the strip of row `j`.
            let KdPrimitive::Triangle(a, b, c) = hits[0].vertices else {
                panic!("Only triangles were indexed.");
            };
            for vid in [a, b, c] {
                let row = vid / (GRID_SIZE + 1);
                assert!(row == j || row == j + 1);
            }
        }
    }
}

#[test]
fn triangle_fan_disk() {
    let num_rim = 32;
    let mut vertices = vec![Point3::origin()];
    vertices.extend((0..=num_rim).map(|k| {
        let angle = k as f32 / num_rim as f32 * std::f32::consts::TAU;
        Point3::new(angle.cos() * 4.0, angle.sin() * 4.0, 0.0)
    }));
    let num_vertices = vertices.len() as u32;
    let geometry = Geometry::new(
        vertices,
        vec![PrimitiveSet::draw_arrays(PrimitiveMode::TriangleFan, 0, num_vertices)],
    );

    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(2);
    let mut tree = KdTree::new();
    assert!(tree.build(&options, &geometry));
    tree.assert_well_formed();
    assert_eq!(tree.num_primitives(), num_rim);

    for slot in 0..tree.num_primitives() {
        let Some(KdPrimitive::Triangle(center, _, _)) = tree.primitive(slot) else {
            panic!("Fans only produce triangles.");
        };
        assert_eq!(center, 0);
    }

    let start = Point3::new(1.1, 2.3, -1.0);
    let end = Point3::new(1.1, 2.3, 1.0);
    let mut intersector = KdTreeRayIntersector::new(start, end);
    tree.intersect_line_segment(&mut intersector, &start, &end);
    assert_eq!(intersector.hits().len(), 1);
    approx::assert_relative_eq!(intersector.hits()[0].time_of_impact, 0.5);
}

#[test]
fn draw_array_lengths_triangles_and_line_loop() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(6.0, 5.0, 5.0),
        Point3::new(6.0, 6.0, 5.0),
    ];
    let geometry = Geometry::new(
        vertices,
        vec![
            PrimitiveSet::draw_array_lengths(PrimitiveMode::Triangles, 0, vec![3, 3]),
            PrimitiveSet::draw_arrays(PrimitiveMode::LineLoop, 6, 3),
        ],
    );

    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(1);
    let mut tree = KdTree::new();
    assert!(tree.build(&options, &geometry));
    tree.assert_well_formed();

    let mut primitives: Vec<_> = (0..tree.num_primitives())
        .filter_map(|slot| tree.primitive(slot))
        .collect();
    primitives.sort_by_key(|p| format!("{:?}", p));
    assert_eq!(
        primitives,
        vec![
            KdPrimitive::Line(6, 7),
            KdPrimitive::Line(7, 8),
            KdPrimitive::Line(8, 6),
            KdPrimitive::Triangle(0, 1, 2),
            KdPrimitive::Triangle(3, 4, 5),
        ]
    );
}
