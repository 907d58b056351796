//! Visibility and paint order.
//!
//! Every frame each object's vertices are moved into world space, its faces
//! get a fresh centroid depth and normal, back faces are dropped and the rest
//! are ordered farthest first. The result is a list of face indices; the mesh
//! itself is never reordered or shrunk.

use crate::math::{Mat4, Vec3};
use crate::mesh::{Face, Mesh, Vertex};

/// Writes `world * (offset + local)` into every vertex's world position.
pub fn transform_vertices(vertices: &mut [Vertex], world: &Mat4, offset: Vec3) {
    for vertex in vertices {
        vertex.world = *world * (offset + vertex.local);
    }
}

/// Refreshes each face's centroid depth and averaged world-oriented normal.
pub fn update_faces(vertices: &[Vertex], faces: &mut [Face], world: &Mat4) {
    for face in faces {
        let [a, b, c] = face.indices().map(|i| &vertices[i]);
        face.centroid_z = (a.world.z + b.world.z + c.world.z) / 3.0;
        face.normal = world.transform_direction((a.normal + b.normal + c.normal) / 3.0);
    }
}

/// Back-face test in world XY: clockwise faces (negative cross product) face
/// the viewer.
#[inline]
pub fn is_front_facing(a: Vec3, b: Vec3, c: Vec3) -> bool {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x < 0.0
}

/// Selection sort of face indices by centroid depth, farthest first.
///
/// Time complexity: O(n²)
/// Space complexity: O(1)
pub fn selection_sort_by_depth_descending(order: &mut [usize], faces: &[Face]) {
    for i in 0..order.len() {
        let mut farthest = i;
        for j in i + 1..order.len() {
            if faces[order[j]].centroid_z > faces[order[farthest]].centroid_z {
                farthest = j;
            }
        }
        order.swap(i, farthest);
    }
}

/// Runs the whole stage for one mesh, leaving the paint order in `visible`.
///
/// `visible` is cleared first and only grows, so one vector can serve every
/// object of every frame.
pub fn prepare(
    mesh: &mut Mesh,
    offset: Vec3,
    world: &Mat4,
    backface_culling: bool,
    visible: &mut Vec<usize>,
) {
    let (vertices, faces) = mesh.parts_mut();
    transform_vertices(vertices, world, offset);
    update_faces(vertices, faces, world);

    visible.clear();
    visible.extend(faces.iter().enumerate().filter_map(|(index, face)| {
        let [a, b, c] = face.indices().map(|i| vertices[i].world);
        (!backface_culling || is_front_facing(a, b, c)).then_some(index)
    }));
    selection_sort_by_depth_descending(visible, faces);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn push_away() -> Mat4 {
        Mat4::identity().translate(Vec3::new(0.0, 0.0, 3.0))
    }

    #[test]
    fn clockwise_faces_are_front_facing_and_reversal_flips_it() {
        let a = Vec3::new(-1.0, 1.0, 2.0);
        let b = Vec3::new(1.0, 1.0, 2.0);
        let c = Vec3::new(1.0, -1.0, 2.0);
        assert!(is_front_facing(a, b, c));
        assert!(!is_front_facing(a, c, b));
    }

    #[test]
    fn edge_on_faces_are_culled() {
        let a = Vec3::new(1.0, 1.0, 2.0);
        let b = Vec3::new(1.0, 1.0, 4.0);
        let c = Vec3::new(1.0, -1.0, 4.0);
        assert!(!is_front_facing(a, b, c));
    }

    #[test]
    fn sort_orders_farthest_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let faces: Vec<Face> = (0..64)
            .map(|i| {
                let mut face = Face::new(0, 0, 0);
                // Distinct depths: a shuffled ramp plus jitter below the step.
                face.centroid_z = (i * 7 % 64) as f32 + rng.gen_range(0.0..0.5);
                face
            })
            .collect();
        let mut order: Vec<usize> = (0..faces.len()).collect();

        selection_sort_by_depth_descending(&mut order, &faces);

        for pair in order.windows(2) {
            assert!(faces[pair[0]].centroid_z > faces[pair[1]].centroid_z);
        }
    }

    #[test]
    fn body_offset_applies_before_world_transform() {
        let mut vertices = vec![Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::ZERO)];
        let world = Mat4::identity()
            .translate(Vec3::new(0.0, 0.0, 3.0))
            .rotate_degrees(Vec3::new(0.0, 90.0, 0.0));
        transform_vertices(&mut vertices, &world, Vec3::new(1.0, 0.0, 0.0));
        // (2, 0, 0) spun a quarter turn about Y lands at z = -2, then pushed to 1.
        approx::assert_relative_eq!(vertices[0].world.z, 1.0, epsilon = 1e-5);
        approx::assert_relative_eq!(vertices[0].world.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn cube_shows_only_its_front_side() {
        let mut cube = Mesh::cube();
        let mut visible = Vec::new();
        prepare(&mut cube, Vec3::ZERO, &push_away(), true, &mut visible);

        assert_eq!(visible.len(), 2);
        for &index in &visible {
            let face = cube.faces()[index];
            approx::assert_relative_eq!(face.centroid_z, 2.0, epsilon = 1e-5);
            assert!(face.normal.z < 0.0);
        }
    }

    #[test]
    fn culling_off_keeps_every_face_in_depth_order() {
        let mut cube = Mesh::cube();
        let mut visible = vec![99];
        prepare(&mut cube, Vec3::ZERO, &push_away(), false, &mut visible);

        assert_eq!(visible.len(), 12);
        let depths: Vec<f32> = visible.iter().map(|&i| cube.faces()[i].centroid_z).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        // Face list itself untouched.
        assert_eq!(cube.faces().len(), 12);
    }

    #[test]
    fn face_normals_follow_the_world_rotation() {
        let mut plane = Mesh::plane();
        let mut visible = Vec::new();
        let world = Mat4::identity().rotate_degrees(Vec3::new(0.0, 180.0, 0.0));
        prepare(&mut plane, Vec3::ZERO, &world, false, &mut visible);
        for face in plane.faces() {
            approx::assert_relative_eq!(face.normal.z, 1.0, epsilon = 1e-5);
        }
    }
}
