//! Point-mass kinematics for scene objects.
//!
//! The renderer only reads [`Body::position`], which offsets every vertex of
//! the owning object before the world transform. The integrator is kept simple:
//! constant acceleration over a step and a perfectly elastic floor at `y = 0`.

use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl Default for Body {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Body {
    /// A resting unit mass at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            mass: 1.0,
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    /// Advances the body by `dt` seconds.
    ///
    /// A body that reaches or crosses the floor has its whole velocity reversed.
    pub fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt + self.acceleration * (0.5 * dt * dt);
        self.velocity += self.acceleration * dt;

        if self.position.y <= 0.0 && self.velocity.y < 0.0 {
            self.velocity = -self.velocity;
        }
    }

    /// Applies a force for one step by folding it into the acceleration.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }
}
