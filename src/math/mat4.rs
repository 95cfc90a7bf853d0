//! 4x4 transformation matrix using the row-vector convention.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v * Mat4`
//! - Translation is stored in the **last row**
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! # Example
//! ```ignore
//! let world = Mat4::scaling(2.0, 2.0, 2.0) * Mat4::translation(0.0, 0.0, 5.0);
//! let p = Vec4::point(1.0, 0.0, 0.0) * world; // scaled first, then moved
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;
use crate::error::MathError;

/// Determinants with a smaller magnitude make [`Mat4::inverse`] fail.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// When `|up x forward|` falls below this the look-at basis is rebuilt from a
/// secondary up axis.
const PARALLEL_EPSILON: f32 = 1e-3;

/// 4x4 matrix stored as `data[row][col]`, multiplied as `v * M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix. The offset lives in the last row.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    ///
    /// Agrees with [`Vec3::rotate_y`]: positive angles turn +Z toward +X.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed perspective matrix.
    ///
    /// After multiplication the clip-space `w` equals the view-space `z`, so
    /// `1 / w` is the reciprocal depth the rasterizer interpolates.
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians.
    /// * `aspect_ratio` - Width divided by height.
    /// * `near`, `far` - Clip distances, `0 < near < far`.
    pub fn perspective_lh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let q = far / (far - near);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, q, 1.0],
            [0.0, 0.0, -near * q, 0.0],
        ])
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Computes the determinant by cofactor expansion.
    pub fn determinant(&self) -> f32 {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Computes the inverse of the matrix.
    ///
    /// Fails with [`MathError::SingularMatrix`] when the determinant is below
    /// [`SINGULAR_EPSILON`]. Callers substitute identity or skip the feature
    /// that needed the inverse.
    pub fn inverse(&self) -> Result<Mat4, MathError> {
        let m = &self.data;
        let (s, c) = self.minors();
        let determinant =
            s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];

        if determinant.abs() < SINGULAR_EPSILON || !determinant.is_finite() {
            return Err(MathError::SingularMatrix { determinant });
        }

        let inv = 1.0 / determinant;
        let adjugate = [
            [
                m[1][1] * c[5] - m[1][2] * c[4] + m[1][3] * c[3],
                -m[0][1] * c[5] + m[0][2] * c[4] - m[0][3] * c[3],
                m[3][1] * s[5] - m[3][2] * s[4] + m[3][3] * s[3],
                -m[2][1] * s[5] + m[2][2] * s[4] - m[2][3] * s[3],
            ],
            [
                -m[1][0] * c[5] + m[1][2] * c[2] - m[1][3] * c[1],
                m[0][0] * c[5] - m[0][2] * c[2] + m[0][3] * c[1],
                -m[3][0] * s[5] + m[3][2] * s[2] - m[3][3] * s[1],
                m[2][0] * s[5] - m[2][2] * s[2] + m[2][3] * s[1],
            ],
            [
                m[1][0] * c[4] - m[1][1] * c[2] + m[1][3] * c[0],
                -m[0][0] * c[4] + m[0][1] * c[2] - m[0][3] * c[0],
                m[3][0] * s[4] - m[3][1] * s[2] + m[3][3] * s[0],
                -m[2][0] * s[4] + m[2][1] * s[2] - m[2][3] * s[0],
            ],
            [
                -m[1][0] * c[3] + m[1][1] * c[1] - m[1][2] * c[0],
                m[0][0] * c[3] - m[0][1] * c[1] + m[0][2] * c[0],
                -m[3][0] * s[3] + m[3][1] * s[1] - m[3][2] * s[0],
                m[2][0] * s[3] - m[2][1] * s[1] + m[2][2] * s[0],
            ],
        ];

        let mut data = adjugate;
        for value in data.iter_mut().flatten() {
            *value *= inv;
        }
        Ok(Mat4::new(data))
    }

    /// 2x2 minors of the top two rows (`s`) and bottom two rows (`c`).
    fn minors(&self) -> ([f32; 6], [f32; 6]) {
        let m = &self.data;
        let s = [
            m[0][0] * m[1][1] - m[1][0] * m[0][1],
            m[0][0] * m[1][2] - m[1][0] * m[0][2],
            m[0][0] * m[1][3] - m[1][0] * m[0][3],
            m[0][1] * m[1][2] - m[1][1] * m[0][2],
            m[0][1] * m[1][3] - m[1][1] * m[0][3],
            m[0][2] * m[1][3] - m[1][2] * m[0][3],
        ];
        let c = [
            m[2][0] * m[3][1] - m[3][0] * m[2][1],
            m[2][0] * m[3][2] - m[3][0] * m[2][2],
            m[2][0] * m[3][3] - m[3][0] * m[2][3],
            m[2][1] * m[3][2] - m[3][1] * m[2][2],
            m[2][1] * m[3][3] - m[3][1] * m[2][3],
            m[2][2] * m[3][3] - m[3][2] * m[2][3],
        ];
        (s, c)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: `v * (A * B)` applies A first, then B.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

/// Transform a homogeneous row vector: `Vec4 * Mat4`.
impl Mul<Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: Mat4) -> Self::Output {
        let d = &m.data;
        Vec4::new(
            self.x * d[0][0] + self.y * d[1][0] + self.z * d[2][0] + self.w * d[3][0],
            self.x * d[0][1] + self.y * d[1][1] + self.z * d[2][1] + self.w * d[3][1],
            self.x * d[0][2] + self.y * d[1][2] + self.z * d[2][2] + self.w * d[3][2],
            self.x * d[0][3] + self.y * d[1][3] + self.z * d[2][3] + self.w * d[3][3],
        )
    }
}

/// Transform a point (implicit w=1) by an affine matrix, discarding w.
impl Mul<Mat4> for Vec3 {
    type Output = Vec3;

    fn mul(self, m: Mat4) -> Self::Output {
        (Vec4::from(self) * m).to_vec3()
    }
}

/// A matrix known to hold only a rotation and a translation.
///
/// The only way to build one is through constructors that cannot introduce
/// scale or shear, which is what makes [`RigidTransform::inverse`] valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform(Mat4);

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self(Mat4::identity())
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self(Mat4::translation(x, y, z))
    }

    pub fn rotation_x(angle: f32) -> Self {
        Self(Mat4::rotation_x(angle))
    }

    pub fn rotation_y(angle: f32) -> Self {
        Self(Mat4::rotation_y(angle))
    }

    pub fn rotation_z(angle: f32) -> Self {
        Self(Mat4::rotation_z(angle))
    }

    /// Builds the camera-to-world transform of an eye at `position` looking at
    /// `target`.
    ///
    /// Rows are right, up, forward and the position. A zero-length view
    /// direction falls back to +Z. An `up` parallel to the view direction is
    /// replaced by world +Z, or world +X when the view itself is along Z.
    pub fn point_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position)
            .try_normalize()
            .unwrap_or(Vec3::FORWARD);
        let up = orthogonal_up(forward, up);
        let right = up.cross(forward);

        Self(Mat4::new([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [forward.x, forward.y, forward.z, 0.0],
            [position.x, position.y, position.z, 1.0],
        ]))
    }

    /// Chains two rigid transforms: `self` first, then `next`.
    pub fn then(&self, next: &RigidTransform) -> Self {
        Self(self.0 * next.0)
    }

    /// Inverts by transposing the rotation block and negating the rotated
    /// translation. Exact for rigid transforms, never fails.
    pub fn inverse(&self) -> Self {
        let m = &self.0.data;
        let mut r = [[0.0f32; 4]; 4];
        for (row, values) in r.iter_mut().enumerate().take(3) {
            for (col, value) in values.iter_mut().enumerate().take(3) {
                *value = m[col][row];
            }
        }
        for col in 0..3 {
            r[3][col] = -(m[3][0] * r[0][col] + m[3][1] * r[1][col] + m[3][2] * r[2][col]);
        }
        r[3][3] = 1.0;
        Self(Mat4::new(r))
    }

    pub fn matrix(&self) -> Mat4 {
        self.0
    }
}

fn orthogonal_up(forward: Vec3, up: Vec3) -> Vec3 {
    let candidates = [up, Vec3::FORWARD, Vec3::RIGHT];
    candidates
        .iter()
        .map(|&axis| axis - forward * axis.dot(forward))
        .find(|projected| projected.magnitude() > PARALLEL_EPSILON)
        .map(|projected| projected.normalize())
        .unwrap_or(Vec3::UP)
}
