//! Single-plane clipping of triangles and line segments.
//!
//! This is Sutherland-Hodgman specialized to primitives with two or three
//! vertices: a triangle clipped by one plane is at most a quadrilateral, which
//! is emitted as two triangles, so every clip produces zero, one or two
//! primitives of the input's own kind.
//!
//! A vertex is inside when its signed distance is strictly positive. Vertices
//! lying exactly on the plane count as outside, so a sliver that only touches
//! the plane is dropped instead of emitted twice by neighbouring clips.

use crate::math::vec3::Vec3;
use crate::primitive::{Line, Triangle, Vertex};

/// A plane given by a point on it and a normal pointing to the kept side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub const fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Signed distance (scaled by the normal's length) from a point to this plane.
    /// Positive = inside, zero or negative = outside.
    #[inline]
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        self.normal.dot(position - self.point)
    }

    /// Intersection of the edge `a -> b` with the plane. Texture coordinates
    /// are interpolated with the same parameter as the position.
    ///
    /// Only called for edges with one strictly inside endpoint and one
    /// outside endpoint, so the distances always differ.
    #[inline]
    fn intersect(&self, a: &Vertex, da: f32, b: &Vertex, db: f32) -> Vertex {
        let t = da / (da - db);
        a.lerp(b, t)
    }
}

/// Result of clipping one primitive against one plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clipped<T> {
    /// Entirely outside.
    Culled,
    One(T),
    Two(T, T),
}

impl<T> Clipped<T> {
    pub fn len(&self) -> usize {
        match self {
            Clipped::Culled => 0,
            Clipped::One(_) => 1,
            Clipped::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::Culled)
    }
}

impl<T> IntoIterator for Clipped<T> {
    type Item = T;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<T>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        let pair = match self {
            Clipped::Culled => [None, None],
            Clipped::One(a) => [Some(a), None],
            Clipped::Two(a, b) => [Some(a), Some(b)],
        };
        pair.into_iter().flatten()
    }
}

/// Primitives that can be clipped against a single plane.
pub trait Clip: Sized {
    fn clip_against_plane(&self, plane: &Plane) -> Clipped<Self>;
}

impl Clip for Triangle {
    fn clip_against_plane(&self, plane: &Plane) -> Clipped<Self> {
        let v = &self.vertices;
        let d = v.map(|vertex| plane.signed_distance(vertex.position));
        let cut = |from: usize, to: usize| plane.intersect(&v[from], d[from], &v[to], d[to]);

        let inside_count = d.iter().filter(|&&distance| distance > 0.0).count();

        // Outputs keep the input's winding: vertices are taken in cyclic order
        // starting from the lone inside (or outside) vertex.
        match inside_count {
            0 => Clipped::Culled,
            1 => {
                let a = d.iter().position(|&distance| distance > 0.0).unwrap_or(0);
                let (next, prev) = ((a + 1) % 3, (a + 2) % 3);
                Clipped::One(self.with_vertices([v[a], cut(a, next), cut(a, prev)]))
            }
            2 => {
                let o = d.iter().position(|&distance| distance <= 0.0).unwrap_or(0);
                let (a, b) = ((o + 1) % 3, (o + 2) % 3);
                let a_cut = cut(a, o);
                let b_cut = cut(b, o);
                Clipped::Two(
                    self.with_vertices([v[a], v[b], a_cut]),
                    self.with_vertices([v[b], b_cut, a_cut]),
                )
            }
            _ => Clipped::One(*self),
        }
    }
}

impl Clip for Line {
    fn clip_against_plane(&self, plane: &Plane) -> Clipped<Self> {
        let [a, b] = &self.vertices;
        let da = plane.signed_distance(a.position);
        let db = plane.signed_distance(b.position);

        match (da > 0.0, db > 0.0) {
            (true, true) => Clipped::One(*self),
            (false, false) => Clipped::Culled,
            (true, false) => {
                Clipped::One(self.with_vertices([*a, plane.intersect(a, da, b, db)]))
            }
            (false, true) => {
                Clipped::One(self.with_vertices([plane.intersect(a, da, b, db), *b]))
            }
        }
    }
}
