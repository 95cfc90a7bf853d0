//! Lighting types for the renderer.

use crate::math::vec3::Vec3;

/// Default lower bound of the shading term.
pub const DEFAULT_AMBIENT: f32 = 0.5;

/// A point light used for flat, per-triangle shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position of the light.
    pub position: Vec3,
    /// Minimum intensity, so faces turned away from the light stay visible.
    pub ambient: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        PointLight {
            position,
            ambient: DEFAULT_AMBIENT,
        }
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    /// Calculate light intensity for flat shading.
    ///
    /// `max(ambient, normal . direction_to_light)`, where the direction is
    /// taken from the triangle's centroid. `normal` must be unit length.
    pub fn intensity(&self, normal: Vec3, centroid: Vec3) -> f32 {
        let to_light = (self.position - centroid).normalize();
        normal.dot(to_light).max(self.ambient)
    }
}
