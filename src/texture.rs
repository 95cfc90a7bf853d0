use std::path::Path;

use crate::colors;
use crate::error::TextureError;

/// Source of texels for the textured fill.
///
/// Read concurrently by the tiled rasterizer, so implementations must be
/// `Send + Sync` and must not rely on interior mutation.
pub trait Sampler: Send + Sync {
    /// Returns the ARGB color at normalized coordinates `(u, v)`.
    fn sample(&self, u: f32, v: f32) -> u32;
}

/// Represents a 2D texture for texture mapping.
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,
    height: u32,
}

impl Texture {
    // Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        let data = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                colors::pack(a, r, g, b)
            })
            .collect();

        Self::from_argb(width, height, data)
    }

    /// Wraps row-major ARGB pixels, top row first.
    pub fn from_argb(width: u32, height: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        if data.len() != width as usize * height as usize {
            return Err(TextureError::DimensionMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A `cells` x `cells` checkerboard of two colors, one texel per cell.
    pub fn checkerboard(cells: u32, a: u32, b: u32) -> Result<Self, TextureError> {
        let data = (0..cells * cells)
            .map(|i| if (i % cells + i / cells) % 2 == 0 { a } else { b })
            .collect();
        Self::from_argb(cells, cells, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Sampler for Texture {
    /// Nearest-neighbor sampling with repeat wrapping. `(0, 0)` is the
    /// top-left texel.
    #[inline]
    fn sample(&self, u: f32, v: f32) -> u32 {
        // rem_euclid handles negative coordinates, unlike %
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }
}
