use kdtree3d::partitioning::{KdPrimitive, KdTree};
use kdtree3d::query::{local_ray_intersection_with_triangle, Ray};
use nalgebra::Point3;

mod cube_picking;
mod line_point_picking;
mod primitive_sets;
mod random_meshes;

/// The slots of the triangles crossed by `[start, end]`, found by testing every primitive.
pub fn brute_force_triangle_hits(
    tree: &KdTree,
    start: &Point3<f32>,
    end: &Point3<f32>,
) -> Vec<usize> {
    let ray = Ray::from_segment(start, end);
    let vertices = tree.vertices();

    (0..tree.num_primitives())
        .filter(|slot| match tree.primitive(*slot) {
            Some(KdPrimitive::Triangle(a, b, c)) => local_ray_intersection_with_triangle(
                &vertices[a as usize],
                &vertices[b as usize],
                &vertices[c as usize],
                &ray,
            )
            .map(|(inter, _)| inter.time_of_impact <= 1.0)
            .unwrap_or(false),
            _ => false,
        })
        .collect()
}
