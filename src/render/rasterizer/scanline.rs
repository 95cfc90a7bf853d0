//! Scanline-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! The scanline algorithm processes triangles one horizontal line at a time:
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space)
//! 2. **Walk edges**: the long edge `v0 -> v2` bounds one side of every row,
//!    the short edges `v0 -> v1` then `v1 -> v2` bound the other side
//! 3. **Fill spans** between the two edge positions
//!
//! ```text
//!        v0
//!        /\
//!       /  \          rows above v1: long edge vs v0 -> v1
//!      /----\ v1      rows below v1: long edge vs v1 -> v2
//!     /    /
//!    /  /
//!   //
//!  v2
//! ```
//!
//! # Coverage
//!
//! Rows `ceil(v0.y) .. ceil(v2.y)` and columns `ceil(left) .. ceil(right)` are
//! half-open, so triangles sharing an edge never both cover a pixel on it.
//! Attributes are evaluated at integer pixel coordinates.
//!
//! # Perspective correction
//!
//! After projection each vertex carries `u/w`, `v/w` and `1/w`, all of which
//! are linear in screen space. The fill interpolates them linearly and divides
//! by the interpolated `1/w` per pixel to recover `u` and `v`.

use crate::colors;
use crate::id::ObjectId;
use crate::primitive::{Triangle, Vertex};
use crate::render::target::RasterTarget;
use crate::texture::Sampler;

/// Vertex attributes that vary linearly in screen space.
#[derive(Clone, Copy, Debug)]
struct ScanVertex {
    x: f32,
    y: f32,
    /// `u / w`
    u: f32,
    /// `v / w`
    v: f32,
    /// `1 / w`, also the depth value.
    w: f32,
}

impl ScanVertex {
    fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            x: vertex.position.x,
            y: vertex.position.y,
            u: vertex.texcoord.u,
            v: vertex.texcoord.v,
            w: vertex.texcoord.w,
        }
    }

    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            u: self.u + (other.u - self.u) * t,
            v: self.v + (other.v - self.v) * t,
            w: self.w + (other.w - self.w) * t,
        }
    }
}

/// Scanline-based triangle rasterizer.
///
/// Stateless: the same instance can serve any number of targets, including
/// several tiles on different threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Fills a screen-space triangle with its flat color.
    pub fn fill_flat<T: RasterTarget>(&self, triangle: &Triangle, target: &mut T) {
        let color = triangle.color;
        walk_triangle(&triangle.vertices, triangle.id, target, |_| Some(color));
    }

    /// Fills a screen-space triangle with perspective-correct texture samples
    /// tinted by its color. Texels with zero alpha leave the pixel untouched.
    pub fn fill_textured<T: RasterTarget>(
        &self,
        triangle: &Triangle,
        sampler: &dyn Sampler,
        target: &mut T,
    ) {
        let tint = triangle.color;
        walk_triangle(&triangle.vertices, triangle.id, target, |p| {
            let texel = sampler.sample(p.u / p.w, p.v / p.w);
            if colors::alpha(texel) == 0 {
                None
            } else {
                Some(colors::modulate(texel, tint))
            }
        });
    }
}

/// Walks every covered pixel inside `target.bounds()`, depth tests it and
/// writes the color returned by `shade`. `None` skips the pixel entirely.
fn walk_triangle<T, F>(vertices: &[Vertex; 3], id: ObjectId, target: &mut T, mut shade: F)
where
    T: RasterTarget,
    F: FnMut(&ScanVertex) -> Option<u32>,
{
    let mut v = vertices.map(|vertex| ScanVertex::from_vertex(&vertex));
    v.sort_unstable_by(|a, b| a.y.total_cmp(&b.y));
    let [v0, v1, v2] = v;

    let total_height = v2.y - v0.y;
    if total_height < f32::EPSILON || !total_height.is_finite() {
        return; // Degenerate triangle (zero height)
    }

    let bounds = target.bounds();
    let y_start = (v0.y.ceil() as i32).max(bounds.min_y);
    let y_end = (v2.y.ceil() as i32).min(bounds.max_y);

    for y in y_start..y_end {
        let yf = y as f32;
        let long = v0.lerp(&v2, (yf - v0.y) / total_height);

        let short = if yf < v1.y {
            let height = v1.y - v0.y;
            if height < f32::EPSILON {
                continue;
            }
            v0.lerp(&v1, (yf - v0.y) / height)
        } else {
            let height = v2.y - v1.y;
            if height < f32::EPSILON {
                continue;
            }
            v1.lerp(&v2, (yf - v1.y) / height)
        };

        let (left, right) = if long.x <= short.x {
            (long, short)
        } else {
            (short, long)
        };

        let span = right.x - left.x;
        if span < f32::EPSILON {
            continue;
        }

        let x_start = (left.x.ceil() as i32).max(bounds.min_x);
        let x_end = (right.x.ceil() as i32).min(bounds.max_x);

        for x in x_start..x_end {
            let p = left.lerp(&right, (x as f32 - left.x) / span);
            if !target.passes_depth(x, y, p.w) {
                continue;
            }
            if let Some(color) = shade(&p) {
                target.write(x, y, p.w, id, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;
    use crate::primitive::TexCoord;
    use crate::render::framebuffer::FrameBuffers;
    use crate::render::sink::ColorBuffer;
    use crate::render::target::FrameTarget;
    use crate::texture::Texture;

    /// Screen-space triangle at constant reciprocal depth `inv_w`.
    fn screen_triangle(points: [(f32, f32); 3], inv_w: f32, color: u32, id: ObjectId) -> Triangle {
        let mut t = Triangle::new(points.map(|(x, y)| Vec3::new(x, y, 0.5)))
            .with_color(color)
            .with_id(id);
        for vertex in t.vertices.iter_mut() {
            vertex.texcoord.w = inv_w;
        }
        t
    }

    fn count_id(buffers: &FrameBuffers, id: ObjectId) -> usize {
        buffers.ids().iter().filter(|&&i| i == id).count()
    }

    #[test]
    fn fills_half_open_rectangle_exactly() {
        let mut buffers = FrameBuffers::new(10, 10);
        let mut pixels = ColorBuffer::new(10, 10);
        let rasterizer = ScanlineRasterizer::new();
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            let a = screen_triangle([(2.0, 2.0), (6.0, 2.0), (6.0, 5.0)], 0.5, 0xFFFF0000, 1);
            let b = screen_triangle([(2.0, 2.0), (6.0, 5.0), (2.0, 5.0)], 0.5, 0xFFFF0000, 2);
            rasterizer.fill_flat(&a, &mut target);
            rasterizer.fill_flat(&b, &mut target);
        }

        // 4 x 3 pixels, each covered exactly once.
        assert_eq!(count_id(&buffers, 1) + count_id(&buffers, 2), 12);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..6).contains(&x) && (2..5).contains(&y);
                assert_eq!(buffers.id_at(x, y) != Some(-1), inside, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn closer_triangle_wins_in_either_order() {
        let near = screen_triangle([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)], 0.5, 0xFF00FF00, 1);
        let far = screen_triangle([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)], 0.25, 0xFFFF0000, 2);
        let rasterizer = ScanlineRasterizer::new();

        for order in [[near, far], [far, near]] {
            let mut buffers = FrameBuffers::new(8, 8);
            let mut pixels = ColorBuffer::new(8, 8);
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            for t in &order {
                rasterizer.fill_flat(t, &mut target);
            }
            assert_eq!(buffers.id_at(1, 1), Some(1));
            assert_eq!(pixels.pixel(1, 1), Some(0xFF00FF00));
            assert_eq!(count_id(&buffers, 2), 0);
        }
    }

    #[test]
    fn zero_height_triangle_is_a_no_op() {
        let mut buffers = FrameBuffers::new(8, 8);
        let mut pixels = ColorBuffer::new(8, 8);
        let mut target = FrameTarget::new(&mut buffers, &mut pixels);
        let flat = screen_triangle([(0.0, 3.0), (5.0, 3.0), (7.0, 3.0)], 0.5, colors::WHITE, 4);
        let thin = screen_triangle([(3.0, 0.0), (3.0, 5.0), (3.0, 7.0)], 0.5, colors::WHITE, 4);
        ScanlineRasterizer::new().fill_flat(&flat, &mut target);
        ScanlineRasterizer::new().fill_flat(&thin, &mut target);
        assert_eq!(count_id(&buffers, 4), 0);
    }

    #[test]
    fn transparent_texels_are_skipped() {
        // Left half opaque white, right half fully transparent.
        let texture = Texture::from_argb(2, 1, vec![colors::WHITE, 0x00FFFFFF]).unwrap();
        let mut t = screen_triangle([(0.0, 0.0), (8.0, 0.0), (8.0, 8.0)], 1.0, 0xFF808080, 3);
        t = t.with_texcoords([TexCoord::new(0.0, 0.0), TexCoord::new(1.0, 0.0), TexCoord::new(1.0, 1.0)]);

        let mut buffers = FrameBuffers::new(8, 8);
        let mut pixels = ColorBuffer::new(8, 8);
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            ScanlineRasterizer::new().fill_textured(&t, &texture, &mut target);
        }

        // u = x / 8 on every row
        assert_eq!(buffers.id_at(6, 1), Some(-1));
        assert_eq!(buffers.depth_at(6, 1), Some(0.0));
        assert_eq!(pixels.pixel(6, 1), Some(colors::BACKGROUND));

        assert_eq!(buffers.id_at(2, 1), Some(3));
        assert_eq!(pixels.pixel(2, 1), Some(0xFF808080));
    }

    #[test]
    fn writes_are_clamped_to_target_bounds() {
        let mut buffers = FrameBuffers::new(4, 4);
        let mut pixels = ColorBuffer::new(4, 4);
        let mut target = FrameTarget::new(&mut buffers, &mut pixels);
        let huge = screen_triangle([(-50.0, -50.0), (100.0, -50.0), (-50.0, 100.0)], 0.5, colors::WHITE, 1);
        ScanlineRasterizer::new().fill_flat(&huge, &mut target);
        assert_eq!(count_id(&buffers, 1), 16);
    }
}
