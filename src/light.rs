//! Lighting types for the renderer.

use crate::config::LightConfig;
use crate::math::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
    /// Level of surfaces facing away from the light.
    pub ambient: u8,
    /// Level added on top of `ambient` for a surface facing the light head-on.
    pub diffuse: u8,
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3, ambient: u8, diffuse: u8) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient,
            diffuse,
        }
    }

    /// Cosine of the angle between the surface normal and the reversed light
    /// direction, negative for surfaces facing away.
    pub fn facing(&self, normal: Vec3) -> f32 {
        (-self.direction).dot(normal.normalize())
    }

    /// Light level of a flat-shaded surface: `ambient` when facing away,
    /// `ambient + diffuse * cos` otherwise, saturating at 255.
    pub fn intensity(&self, normal: Vec3) -> u8 {
        let facing = self.facing(normal);
        if facing <= 0.0 {
            self.ambient
        } else {
            (self.ambient as f32 + self.diffuse as f32 * facing).min(255.0) as u8
        }
    }
}

impl From<LightConfig> for DirectionalLight {
    fn from(config: LightConfig) -> Self {
        let [x, y, z] = config.direction;
        Self::new(Vec3::new(x, y, z), config.ambient, config.diffuse)
    }
}

/// Opaque grey of the given level, as used for shaded outlines.
pub fn grey(level: u8) -> u32 {
    let l = level as u32;
    0xFF00_0000 | (l << 16) | (l << 8) | l
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_light() -> DirectionalLight {
        DirectionalLight::from(LightConfig::default())
    }

    #[test]
    fn test_direct_illumination() {
        // Light travels into the screen, the surface faces the viewer.
        let light = default_light();
        assert_eq!(light.intensity(Vec3::new(0.0, 0.0, -1.0)), 235);
    }

    #[test]
    fn test_no_illumination() {
        // Facing away from the light leaves only the ambient term.
        let light = default_light();
        assert_eq!(light.intensity(Vec3::new(0.0, 0.0, 1.0)), 20);
        assert_eq!(light.intensity(Vec3::new(1.0, 0.0, 0.0)), 20);
    }

    #[test]
    fn test_angled_illumination() {
        // Light pointing straight down (-Y), normal at 45 degrees
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0), 0, 200);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        // cos(45) ≈ 0.707
        assert!((light.facing(normal) - 0.707).abs() < 0.01);
        assert_eq!(light.intensity(normal), 141);
    }

    #[test]
    fn intensity_saturates() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0), 200, 200);
        assert_eq!(light.intensity(Vec3::new(0.0, 0.0, -1.0)), 255);
    }

    #[test]
    fn grey_packs_all_channels() {
        assert_eq!(grey(0x40), 0xFF40_4040);
    }
}
