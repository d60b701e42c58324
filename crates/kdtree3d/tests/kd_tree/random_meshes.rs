use crate::brute_force_triangle_hits;
use kdtree3d::partitioning::{KdTree, KdTreeBuildOptions, KdTreeBuilder};
use kdtree3d::query::visitors::KdTreeRayIntersector;
use kdtree3d::shape::{Geometry, PrimitiveMode, PrimitiveSet};
use nalgebra::Point3;
use rand::{Rng, SeedableRng};

fn random_mesh(
    rng: &mut rand::rngs::StdRng,
    num_vertices: usize,
    num_triangles: usize,
) -> Geometry {
    let vertices = (0..num_vertices)
        .map(|_| {
            Point3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-2.0..2.0),
            )
        })
        .collect();
    let indices = (0..num_triangles * 3)
        .map(|_| rng.gen_range(0..num_vertices as u32))
        .collect();

    Geometry::new(
        vertices,
        vec![PrimitiveSet::draw_elements(PrimitiveMode::Triangles, indices)],
    )
}

#[test]
fn kd_tree_picking_matches_brute_force() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    for _ in 0..10 {
        let geometry = random_mesh(&mut rng, 300, 500);
        let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(8);
        let mut tree = KdTree::new();
        assert!(tree.build(&options, &geometry));
        tree.assert_well_formed();

        for _ in 0..50 {
            let start = Point3::new(
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-4.0..4.0),
            );
            let end = Point3::new(
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-4.0..4.0),
            );

            let mut intersector = KdTreeRayIntersector::new(start, end);
            tree.intersect_line_segment(&mut intersector, &start, &end);
            let mut slots: Vec<_> = intersector.hits().iter().map(|hit| hit.primitive).collect();
            slots.sort_unstable();

            assert_eq!(slots, brute_force_triangle_hits(&tree, &start, &end));

            let sorted = intersector.into_sorted_hits();
            assert!(sorted
                .windows(2)
                .all(|w| w[0].time_of_impact <= w[1].time_of_impact));
        }
    }
}

#[test]
fn kd_tree_queries_run_concurrently() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<KdTree>();

    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let geometry = random_mesh(&mut rng, 200, 400);
    let mut tree = KdTree::new();
    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(4);
    assert!(tree.build(&options, &geometry));

    let segments: Vec<_> = (0..8)
        .map(|k| {
            let y = k as f32 * 2.0 - 8.0;
            (Point3::new(-12.0, y, 0.1), Point3::new(12.0, y, -0.1))
        })
        .collect();

    let sequential: Vec<_> = segments
        .iter()
        .map(|(start, end)| brute_force_triangle_hits(&tree, start, end))
        .collect();

    let concurrent: Vec<Vec<usize>> = std::thread::scope(|scope| {
        let handles: Vec<_> = segments
            .iter()
            .map(|(start, end)| {
                let tree = &tree;
                scope.spawn(move || {
                    let mut intersector = KdTreeRayIntersector::new(*start, *end);
                    tree.intersect_line_segment(&mut intersector, start, end);
                    let mut slots: Vec<_> =
                        intersector.hits().iter().map(|hit| hit.primitive).collect();
                    slots.sort_unstable();
                    slots
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(concurrent, sequential);
}

#[test]
fn kd_tree_builder_batches_geometries() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2);
    let geometries: Vec<_> = [(120, 200), (10, 50), (80, 20)]
        .into_iter()
        .map(|(num_vertices, num_triangles)| random_mesh(&mut rng, num_vertices, num_triangles))
        .collect();

    let options = KdTreeBuildOptions::default().with_target_num_triangles_per_leaf(16);
    let mut builder = KdTreeBuilder::new(options);
    let trees = builder.build_all(&geometries);

    assert_eq!(trees.iter().filter(|tree| tree.is_some()).count(), 2);
    assert!(trees[1].is_none());
    assert_eq!(builder.num_vertices_processed(), 200);
}
