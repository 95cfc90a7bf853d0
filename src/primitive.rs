//! Triangles and line segments submitted by the application each frame.
//!
//! The same types flow through every pipeline stage: world space on input,
//! view space after the camera transform, screen space on output. After
//! projection the texture coordinates hold `u/w`, `v/w` and `1/w`.

use crate::colors;
use crate::id::{ObjectId, NO_OBJECT};
use crate::math::vec3::Vec3;

/// Texture coordinate with a reciprocal-depth slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
    /// 1 before projection, `1 / w_clip` after.
    pub w: f32,
}

impl Default for TexCoord {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl TexCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v, w: 1.0 }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            u: self.u + (other.u - self.u) * t,
            v: self.v + (other.v - self.v) * t,
            w: self.w + (other.w - self.w) * t,
        }
    }
}

/// A position with its texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub texcoord: TexCoord,
}

impl Vertex {
    pub const fn new(position: Vec3, texcoord: TexCoord) -> Self {
        Self { position, texcoord }
    }

    /// Interpolates position and texture coordinate with the same `t`.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            texcoord: self.texcoord.lerp(other.texcoord, t),
        }
    }
}

impl From<Vec3> for Vertex {
    fn from(position: Vec3) -> Self {
        Self::new(position, TexCoord::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    /// Flat ARGB color shared by the whole face.
    pub color: u32,
    pub id: ObjectId,
}

impl Triangle {
    /// Creates a non-pickable white triangle with zeroed texture coordinates.
    pub fn new(points: [Vec3; 3]) -> Self {
        Self {
            vertices: points.map(Vertex::from),
            color: colors::WHITE,
            id: NO_OBJECT,
        }
    }

    pub fn with_texcoords(mut self, texcoords: [TexCoord; 3]) -> Self {
        for (vertex, texcoord) in self.vertices.iter_mut().zip(texcoords) {
            vertex.texcoord = texcoord;
        }
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    /// Same color and id, different vertices.
    pub fn with_vertices(&self, vertices: [Vertex; 3]) -> Self {
        Self { vertices, ..*self }
    }

    pub fn points(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.position)
    }

    /// Unit face normal `(p1 - p0) x (p2 - p0)`, or `None` for a zero-area
    /// triangle.
    pub fn normal(&self) -> Option<Vec3> {
        let [p0, p1, p2] = self.points();
        (p1 - p0).cross(p2 - p0).try_normalize()
    }

    pub fn centroid(&self) -> Vec3 {
        let [p0, p1, p2] = self.points();
        (p0 + p1 + p2) / 3.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub vertices: [Vertex; 2],
    pub color: u32,
    pub id: ObjectId,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            vertices: [Vertex::from(start), Vertex::from(end)],
            color: colors::WHITE,
            id: NO_OBJECT,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    pub fn with_vertices(&self, vertices: [Vertex; 2]) -> Self {
        Self { vertices, ..*self }
    }
}
