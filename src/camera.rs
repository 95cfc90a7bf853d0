//! Look-at camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! # Orientation
//!
//! Orientation is a forward direction. The view matrix is rebuilt from it each
//! frame with a point-at transform against world up, then inverted with the
//! cheap rigid inverse.
//!
//! # Screen mapping
//!
//! After the perspective divide x and y are negated, shifted by one and
//! scaled by half the viewport, so pixel `(0, 0)` is the top-left corner.

use crate::math::mat4::{Mat4, RigidTransform};
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::Projection;

/// Smallest clip-space `w` accepted by the perspective divide.
pub const W_EPSILON: f32 = 1e-6;

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Camera with a position, a view direction and projection parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// View direction. Expected to be unit length.
    pub forward: Vec3,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::FORWARD,
            projection: Projection::default(),
        }
    }

    /// Creates a camera at `position` looking toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self::new(position);
        camera.look_at(target);
        camera
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    // =========================================================================
    // Orientation & Movement
    // =========================================================================

    /// Points the camera at a world position. A target at the camera position
    /// leaves the orientation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(forward) = (target - self.position).try_normalize() {
            self.forward = forward;
        }
    }

    /// Rotates the view direction around world Y.
    /// Positive values rotate right.
    pub fn rotate_yaw(&mut self, angle: f32) {
        self.forward = self.forward.rotate_y(angle).normalize();
    }

    /// Moves the camera along its view direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.position = self.position + self.forward * distance;
    }

    /// Moves the camera sideways. Positive distance moves right.
    pub fn strafe(&mut self, distance: f32) {
        self.position = self.position + self.right() * distance;
    }

    /// Returns the camera's right direction, `up x forward`.
    pub fn right(&self) -> Vec3 {
        let basis = RigidTransform::point_at(self.position, self.position + self.forward, Vec3::UP);
        let m = basis.matrix();
        Vec3::new(m.get(0, 0), m.get(0, 1), m.get(0, 2))
    }

    // =========================================================================
    // Matrix Generation
    // =========================================================================

    /// World to view space. The inverse of the camera's point-at transform.
    pub fn view_matrix(&self) -> Mat4 {
        RigidTransform::point_at(self.position, self.position + self.forward, Vec3::UP)
            .inverse()
            .matrix()
    }

    /// View to clip space for a viewport with the given aspect ratio.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection.matrix(aspect_ratio)
    }

    // =========================================================================
    // Screen Queries
    // =========================================================================

    /// Projects a world position to pixel coordinates.
    ///
    /// Returns `None` when the point is not in front of the near plane. The
    /// result may lie outside the viewport.
    pub fn world_to_screen(&self, point: Vec3, width: u32, height: u32) -> Option<(f32, f32)> {
        let view = point * self.view_matrix();
        if view.z <= self.projection.z_near() {
            return None;
        }
        let clip = Vec4::from(view) * self.projection_matrix(aspect(width, height));
        let ndc = clip.perspective_divide(W_EPSILON)?;
        Some(ndc_to_screen(ndc.x, ndc.y, width, height))
    }

    /// Builds the world-space ray through a pixel, starting on the near plane.
    ///
    /// Uses the general inverse of view x projection. When that matrix is
    /// singular there is no ray for this frame and `None` is returned.
    pub fn screen_ray(&self, x: f32, y: f32, width: u32, height: u32) -> Option<Ray> {
        let view_projection = self.view_matrix() * self.projection_matrix(aspect(width, height));
        let inverse = match view_projection.inverse() {
            Ok(inverse) => inverse,
            Err(err) => {
                log::debug!("no screen ray this frame: {err}");
                return None;
            }
        };

        let (ndc_x, ndc_y) = screen_to_ndc(x, y, width, height);
        let near = (Vec4::new(ndc_x, ndc_y, 0.0, 1.0) * inverse).perspective_divide(W_EPSILON)?;
        let far = (Vec4::new(ndc_x, ndc_y, 1.0, 1.0) * inverse).perspective_divide(W_EPSILON)?;

        Some(Ray {
            origin: near,
            direction: (far - near).try_normalize()?,
        })
    }
}

/// Width over height, 1 for an empty viewport.
pub fn aspect(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Maps normalized device coordinates to pixels.
#[inline]
pub fn ndc_to_screen(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    (
        (-x + 1.0) * 0.5 * width as f32,
        (-y + 1.0) * 0.5 * height as f32,
    )
}

#[inline]
fn screen_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    (
        1.0 - 2.0 * x / width.max(1) as f32,
        1.0 - 2.0 * y / height.max(1) as f32,
    )
}

// =============================================================================
// Tests
// =============================================================================
