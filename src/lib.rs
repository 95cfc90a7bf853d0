//! A CPU-based software-rendered 3D graphics pipeline.
//!
//! Given a camera, a point light and a list of world-space triangles and line
//! segments, the crate produces depth-correct, optionally textured pixels plus
//! a per-pixel object-id buffer for picking. All rendering is done on the CPU;
//! presentation is left to whatever implements [`PixelSink`].
//!
//! # Quick Start
//!
//! ```ignore
//! use rastrum::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::new(800, 600))?;
//! let mut pixels = ColorBuffer::new(800, 600);
//! engine.render_frame(&mut app, &mut pixels, elapsed);
//! let picked = engine.pick(mouse_x, mouse_y);
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clipping;
pub mod colors;
pub mod engine;
pub mod error;
pub mod id;
pub mod light;
pub mod math;
pub mod pipeline;
pub mod primitive;
pub mod projection;
pub mod render;
pub mod texture;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera, Ray};
pub use engine::{Engine, EngineConfig, FrameCallbacks, FrameGeometry, GeometryProvider};
pub use error::{EngineError, MathError, TextureError};
pub use id::{IdAllocator, ObjectId, NO_OBJECT};
pub use light::PointLight;
pub use pipeline::{ClipPipeline, FrameStats};
pub use primitive::{Line, TexCoord, Triangle, Vertex};
pub use projection::Projection;
pub use render::{ColorBuffer, FrameBuffers, PixelSink, RasterStrategy};
pub use texture::{Sampler, Texture};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rastrum::prelude::*;
/// ```
pub mod prelude {
    // Camera & lighting
    pub use crate::camera::{Camera, Ray};
    pub use crate::light::PointLight;
    pub use crate::projection::Projection;

    // Engine
    pub use crate::engine::{
        Engine, EngineConfig, FrameCallbacks, FrameGeometry, GeometryProvider,
    };
    pub use crate::pipeline::FrameStats;

    // Geometry
    pub use crate::id::{IdAllocator, ObjectId, NO_OBJECT};
    pub use crate::primitive::{Line, TexCoord, Triangle, Vertex};

    // Math
    pub use crate::math::mat4::{Mat4, RigidTransform};
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{ColorBuffer, FrameBuffers, PixelSink, RasterStrategy};
    pub use crate::texture::{Sampler, Texture};
}
