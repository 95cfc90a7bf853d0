//! Depth-tested write targets shared by the rasterizers.
//!
//! The rasterizers only see a [`RasterTarget`], so the same fill and line code
//! writes either straight into the frame or into one tile of it.

use super::framebuffer::FrameBuffers;
use super::sink::PixelSink;
use crate::id::ObjectId;

/// Half-open pixel rectangle `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl PixelRect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> usize {
        (self.max_x - self.min_x).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.max_y - self.min_y).max(0) as usize
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// Abstraction over a render target that supports depth-tested pixel writes.
pub trait RasterTarget {
    /// Pixels this target accepts, in frame coordinates.
    fn bounds(&self) -> PixelRect;

    /// Stored reciprocal depth, or `None` outside [`RasterTarget::bounds`].
    fn depth(&self, x: i32, y: i32) -> Option<f32>;

    /// Writes without testing. Callers test with [`RasterTarget::passes_depth`].
    fn write(&mut self, x: i32, y: i32, depth: f32, id: ObjectId, color: u32);

    /// Strictly closer than what is stored.
    #[inline]
    fn passes_depth(&self, x: i32, y: i32, depth: f32) -> bool {
        self.depth(x, y).is_some_and(|stored| depth > stored)
    }
}

/// Writes straight into the frame buffers and the pixel sink.
pub struct FrameTarget<'a> {
    buffers: &'a mut FrameBuffers,
    sink: &'a mut dyn PixelSink,
}

impl<'a> FrameTarget<'a> {
    pub fn new(buffers: &'a mut FrameBuffers, sink: &'a mut dyn PixelSink) -> Self {
        Self { buffers, sink }
    }
}

impl RasterTarget for FrameTarget<'_> {
    #[inline]
    fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.buffers.width() as i32, self.buffers.height() as i32)
    }

    #[inline]
    fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.buffers.depth_at(x, y)
    }

    #[inline]
    fn write(&mut self, x: i32, y: i32, depth: f32, id: ObjectId, color: u32) {
        self.buffers.store(x, y, depth, id);
        self.sink.set_pixel(x, y, color);
    }
}
