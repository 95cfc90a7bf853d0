//! Rasterization back end: frame buffers, pixel output and the two raster
//! strategies.

pub mod framebuffer;
pub mod rasterizer;
pub mod sink;
pub mod target;
pub mod tiled;

pub use framebuffer::FrameBuffers;
pub use rasterizer::{draw_line, ScanlineRasterizer};
pub use sink::{ColorBuffer, PixelSink};
pub use target::{FrameTarget, PixelRect, RasterTarget};
pub use tiled::{TileGrid, TileTarget, TiledRasterizer, DEFAULT_TILE_SIZE};

/// How screen-space primitives are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterStrategy {
    /// Everything on the calling thread, straight into the frame buffers.
    #[default]
    Scanline,
    /// Square tiles rasterized in parallel on a fixed-size worker pool, then
    /// composited. `workers == 0` uses one thread per core.
    Tiled { tile_size: u32, workers: usize },
}

impl RasterStrategy {
    /// Tiled with the default tile size and one worker per core.
    pub fn tiled() -> Self {
        RasterStrategy::Tiled {
            tile_size: DEFAULT_TILE_SIZE,
            workers: 0,
        }
    }
}

impl std::fmt::Display for RasterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterStrategy::Scanline => write!(f, "Scanline"),
            RasterStrategy::Tiled { tile_size, workers: 0 } => {
                write!(f, "Tiled ({tile_size}px, auto workers)")
            }
            RasterStrategy::Tiled { tile_size, workers } => {
                write!(f, "Tiled ({tile_size}px, {workers} workers)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_display() {
        assert_eq!(RasterStrategy::Scanline.to_string(), "Scanline");
        assert_eq!(
            RasterStrategy::Tiled { tile_size: 32, workers: 4 }.to_string(),
            "Tiled (32px, 4 workers)"
        );
        assert_eq!(RasterStrategy::tiled().to_string(), "Tiled (64px, auto workers)");
    }
}
