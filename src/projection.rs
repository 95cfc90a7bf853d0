//! Perspective projection parameters.
//!
//! The field of view is given in degrees at the boundary and stored in
//! radians. The aspect ratio is not stored: it follows the viewport and is
//! passed in when the matrix is built each frame.

use crate::math::mat4::Mat4;

const MIN_FOV_DEGREES: f32 = 1.0;
const MAX_FOV_DEGREES: f32 = 179.0;
const MIN_Z_NEAR: f32 = 1e-4;
const MIN_DEPTH_RANGE: f32 = 1e-3;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_degrees(90.0, 0.1, 1000.0)
    }
}

impl Projection {
    /// Creates a projection from a vertical field of view in degrees.
    ///
    /// Out of range values are clamped with a warning: the field of view to
    /// `[1, 179]` degrees, `z_near` to a small positive value and `z_far` to
    /// lie beyond `z_near`.
    pub fn from_degrees(fov_y_degrees: f32, z_near: f32, z_far: f32) -> Self {
        let fov = if fov_y_degrees.is_finite() {
            fov_y_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES)
        } else {
            90.0
        };
        if fov != fov_y_degrees {
            log::warn!("field of view {fov_y_degrees} clamped to {fov} degrees");
        }

        let near = if z_near.is_finite() { z_near.max(MIN_Z_NEAR) } else { MIN_Z_NEAR };
        if near != z_near {
            log::warn!("near plane {z_near} clamped to {near}");
        }

        let far = if z_far.is_finite() && z_far > near + MIN_DEPTH_RANGE {
            z_far
        } else {
            let far = near + MIN_DEPTH_RANGE.max(near);
            log::warn!("far plane {z_far} clamped to {far}");
            far
        };

        Self {
            fov_y: fov.to_radians(),
            z_near: near,
            z_far: far,
        }
    }

    /// Returns the vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y.to_degrees()
    }

    /// Returns the horizontal field of view in radians for `aspect_ratio`.
    pub fn fov_x(&self, aspect_ratio: f32) -> f32 {
        2.0 * (aspect_ratio * (self.fov_y / 2.0).tan()).atan()
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Generates the left-handed perspective projection matrix.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, aspect_ratio, self.z_near, self.z_far)
    }
}
