//! Pixel output.

use crate::colors;

/// Receives every pixel that passes the depth test.
///
/// A pixel may be written several times per frame when closer primitives
/// arrive later. The last write wins.
pub trait PixelSink {
    fn set_pixel(&mut self, x: i32, y: i32, color: u32);
}

/// An owned ARGB8888 color buffer.
#[derive(Debug, Clone)]
pub struct ColorBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![colors::BACKGROUND; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The pixels as native-endian bytes, for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        // u8 has no alignment requirement and the length covers exactly the
        // same allocation.
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.pixels.len() * 4)
        }
    }
}

impl PixelSink for ColorBuffer {
    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }
}
