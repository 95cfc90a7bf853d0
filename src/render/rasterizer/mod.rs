//! Triangle and line rasterization.
//!
//! - [`ScanlineRasterizer`]: flat and perspective-correct textured fills
//! - [`draw_line`]: depth-tested Bresenham lines
//!
//! Both write through a [`RasterTarget`], so they serve the whole frame and
//! single tiles alike.

mod line;
mod scanline;

pub use line::draw_line;
pub use scanline::ScanlineRasterizer;

use crate::primitive::{Line, Triangle};
use crate::render::target::RasterTarget;
use crate::texture::Sampler;

impl ScanlineRasterizer {
    /// Fills one triangle, textured when a sampler is given.
    #[inline]
    pub fn draw_triangle<T: RasterTarget>(
        &self,
        triangle: &Triangle,
        sampler: Option<&dyn Sampler>,
        target: &mut T,
    ) {
        match sampler {
            Some(sampler) => self.fill_textured(triangle, sampler, target),
            None => self.fill_flat(triangle, target),
        }
    }

    /// Draws triangles then lines, each list in submission order.
    pub fn rasterize<T: RasterTarget>(
        &self,
        triangles: &[Triangle],
        lines: &[Line],
        sampler: Option<&dyn Sampler>,
        target: &mut T,
    ) {
        for triangle in triangles {
            self.draw_triangle(triangle, sampler, target);
        }
        for line in lines {
            draw_line(line, target);
        }
    }
}
