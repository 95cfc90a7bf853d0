//! Error types for the fallible parts of the crate.
//!
//! Nothing on the per-frame path returns these: a frame always renders, with
//! degenerate primitives dropped. They surface from setup (texture loading,
//! worker pool creation) and from math callers that must choose a fallback.

use thiserror::Error;

/// Failures of the linear algebra layer.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f32 },
}

/// Failures while building a [`crate::texture::Texture`].
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture: {0}")]
    Image(#[from] image::ImageError),

    #[error("texture is {width}x{height} but {len} pixels were supplied")]
    DimensionMismatch { width: u32, height: u32, len: usize },

    #[error("texture dimensions must be non-zero")]
    Empty,
}

/// Failures while constructing an [`crate::engine::Engine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build rasterizer worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("tile size must be non-zero")]
    ZeroTileSize,
}
