//! Depth and object-id buffers for one viewport.
//!
//! The depth buffer stores 1/w values (reciprocal of clip-space W) for each pixel.
//! Using 1/w instead of z because it can be linearly interpolated in screen space.
//! Larger values are closer to the camera, and 0 means nothing was drawn.

use crate::id::{ObjectId, NO_OBJECT};

/// Owned depth and id buffers, reset every frame and reallocated on resize.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    width: u32,
    height: u32,
    depth: Vec<f32>,
    ids: Vec<ObjectId>,
}

impl FrameBuffers {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            depth: vec![0.0; size],
            ids: vec![NO_OBJECT; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major index of `(x, y)`, or `None` outside the viewport.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Clears depth to 0 (infinitely far) and ids to [`NO_OBJECT`].
    pub fn reset(&mut self) {
        self.depth.fill(0.0);
        self.ids.fill(NO_OBJECT);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    #[inline]
    pub fn id_at(&self, x: i32, y: i32) -> Option<ObjectId> {
        self.index(x, y).map(|i| self.ids[i])
    }

    /// Unconditionally records depth and id. Out-of-bounds writes are ignored.
    #[inline]
    pub fn store(&mut self, x: i32, y: i32, depth: f32, id: ObjectId) {
        if let Some(i) = self.index(x, y) {
            self.depth[i] = depth;
            self.ids[i] = id;
        }
    }

    /// The id buffer, indexed as `x + width * y`.
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_bounds_checked() {
        let buffers = FrameBuffers::new(4, 3);
        assert_eq!(buffers.index(0, 0), Some(0));
        assert_eq!(buffers.index(3, 2), Some(11));
        assert_eq!(buffers.index(4, 0), None);
        assert_eq!(buffers.index(0, 3), None);
        assert_eq!(buffers.index(-1, 1), None);
    }

    #[test]
    fn reset_clears_depth_and_ids() {
        let mut buffers = FrameBuffers::new(4, 3);
        buffers.store(1, 1, 0.5, 9);
        assert_eq!(buffers.id_at(1, 1), Some(9));

        buffers.reset();
        assert_eq!(buffers.id_at(1, 1), Some(NO_OBJECT));
        assert_eq!(buffers.depth_at(1, 1), Some(0.0));
    }

    #[test]
    fn resize_reallocates() {
        let mut buffers = FrameBuffers::new(4, 3);
        buffers.store(0, 0, 1.0, 1);
        buffers.resize(8, 2);
        assert_eq!(buffers.ids().len(), 16);
        assert_eq!(buffers.id_at(0, 0), Some(NO_OBJECT));
        assert_eq!(buffers.id_at(7, 1), Some(NO_OBJECT));
    }
}
