//! Perspective projection onto the viewport.
//!
//! The [`Projector`] owns the field of view and viewport and keeps the derived
//! focal length in sync with them. Projection is a plain divide by world Z; no
//! near or far plane exists.

use crate::config::Viewport;
use crate::math::{Vec2, Vec3};
use crate::mesh::Vertex;

/// Depths closer to zero than this are treated as `z = 1`.
pub const DEPTH_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Field of view in degrees, always within `[fov_min, fov_max]`.
    fov: f32,
    fov_min: f32,
    fov_max: f32,
    viewport: Viewport,
    half_width: f32,
    half_height: f32,
    focal: f32,
}

impl Projector {
    /// Creates a projector for `viewport` with `fov` clamped into `[fov_min, fov_max]`.
    pub fn new(fov: f32, fov_min: f32, fov_max: f32, viewport: Viewport) -> Self {
        let mut projector = Self {
            fov: fov_min,
            fov_min,
            fov_max,
            viewport,
            half_width: 0.0,
            half_height: 0.0,
            focal: 0.0,
        };
        projector.set_viewport(
            viewport.x,
            viewport.y,
            viewport.width as i32,
            viewport.height as i32,
        );
        projector.set_fov(fov);
        projector
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fov_range(&self) -> (f32, f32) {
        (self.fov_min, self.fov_max)
    }

    /// Sets the field of view in degrees; out-of-range values are clamped.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(self.fov_min, self.fov_max);
        self.update_focal();
    }

    /// Sets the viewport. Negative sizes are taken by magnitude.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = Viewport::new(x, y, width.unsigned_abs(), height.unsigned_abs());
        self.update_focal();
    }

    fn update_focal(&mut self) {
        // Pixel centres run from 0 to size - 1, so the optical axis sits between them.
        self.half_width = (self.viewport.width as f32 - 1.0).max(0.0) * 0.5;
        self.half_height = (self.viewport.height as f32 - 1.0).max(0.0) * 0.5;
        let half_angle = (self.fov * 0.5).to_radians();
        self.focal = self.half_width * (half_angle.cos() / half_angle.sin());
    }

    /// Projects a world-space position to screen coordinates.
    ///
    /// A depth within [`DEPTH_EPSILON`] of zero is replaced by 1. This keeps
    /// the division finite but is an approximation, not a clip.
    #[inline]
    pub fn project_point(&self, world: Vec3) -> Vec2 {
        let z = if world.z.abs() <= DEPTH_EPSILON {
            1.0
        } else {
            world.z
        };
        let inv = self.focal / z;
        Vec2::new(
            world.x * inv + self.half_width + self.viewport.x as f32,
            -world.y * inv + self.half_height + self.viewport.y as f32,
        )
    }

    /// Writes the screen position of `vertex` from its world position.
    #[inline]
    pub fn project(&self, vertex: &mut Vertex) {
        vertex.screen = self.project_point(vertex.world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn projector() -> Projector {
        Projector::new(90.0, 60.0, 100.0, Viewport::new(0, 0, 641, 481))
    }

    #[test]
    fn focal_follows_fov_and_width() {
        let p = projector();
        // 90 degrees: cot(45) = 1, so focal equals half the width
        assert_relative_eq!(p.focal(), 320.0, epsilon = 1e-3);
    }

    #[test]
    fn fov_is_clamped() {
        let mut p = projector();
        p.set_fov(10.0);
        assert_eq!(p.fov(), 60.0);
        p.set_fov(170.0);
        assert_eq!(p.fov(), 100.0);
    }

    #[test]
    fn negative_viewport_sizes_are_absolute() {
        let mut p = projector();
        p.set_viewport(4, 8, -320, -240);
        assert_eq!(p.viewport(), Viewport::new(4, 8, 320, 240));
    }

    #[test]
    fn origin_maps_to_viewport_centre_plus_offset() {
        let mut p = projector();
        p.set_viewport(10, 20, 101, 51);
        let s = p.project_point(Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(s.x, 60.0);
        assert_relative_eq!(s.y, 45.0);
    }

    #[test]
    fn world_y_up_is_screen_y_down() {
        let p = projector();
        let above = p.project_point(Vec3::new(0.0, 1.0, 2.0));
        let below = p.project_point(Vec3::new(0.0, -1.0, 2.0));
        assert!(above.y < below.y);
    }

    #[test]
    fn zero_depth_is_treated_as_one() {
        let p = projector();
        let at_zero = p.project_point(Vec3::new(0.5, 0.25, 0.0));
        let at_one = p.project_point(Vec3::new(0.5, 0.25, 1.0));
        assert_eq!(at_zero, at_one);
        assert!(at_zero.is_finite());
    }

    #[test]
    fn projection_is_idempotent() {
        let p = projector();
        let mut vertex = Vertex::new(Vec3::ZERO, Vec2::ZERO);
        vertex.world = Vec3::new(0.3, -0.7, 2.5);
        p.project(&mut vertex);
        let first = vertex.screen;
        p.project(&mut vertex);
        assert_eq!(vertex.screen, first);
    }

    #[test]
    fn offsets_scale_with_focal_and_inverse_depth() {
        let p = projector();
        let mut rng = ChaCha8Rng::seed_from_u64(0x5ca1e);
        let centre = p.project_point(Vec3::new(0.0, 0.0, 1.0));

        for _ in 0..200 {
            let x: f32 = rng.gen_range(-4.0..4.0);
            let y: f32 = rng.gen_range(-4.0..4.0);
            let z: f32 = rng.gen_range(0.5..20.0);
            let k: f32 = rng.gen_range(0.25..4.0);

            let s = p.project_point(Vec3::new(x, y, z));
            let dx = s.x - centre.x;
            let dy = s.y - centre.y;
            assert_relative_eq!(dx, x * p.focal() / z, epsilon = 1e-2, max_relative = 1e-4);
            assert_relative_eq!(dy, -y * p.focal() / z, epsilon = 1e-2, max_relative = 1e-4);

            // Scaling the position at a fixed depth scales the offset linearly.
            let scaled = p.project_point(Vec3::new(x * k, y * k, z));
            assert_relative_eq!(scaled.x - centre.x, dx * k, epsilon = 1e-2, max_relative = 1e-4);
            assert_relative_eq!(scaled.y - centre.y, dy * k, epsilon = 1e-2, max_relative = 1e-4);
        }
    }
}
