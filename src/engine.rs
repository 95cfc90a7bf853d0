//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns the
//! camera, the light, the clip pipeline, the frame buffers and the raster
//! strategy, and runs one frame at a time:
//!
//! 1. `on_update` lets the application move the camera and light
//! 2. `submit_geometry` collects this frame's world-space primitives
//! 3. the clip pipeline produces screen-space primitives
//! 4. the active strategy rasterizes them into the frame buffers and the sink
//! 5. `on_render` hands the finished buffers back to the application
//!
//! The application plugs in through the [`GeometryProvider`] and
//! [`FrameCallbacks`] traits, passed by reference every frame.

use std::time::Duration;

use crate::camera::{Camera, Ray};
use crate::error::EngineError;
use crate::id::ObjectId;
use crate::light::PointLight;
use crate::pipeline::{ClipPipeline, FrameStats};
use crate::primitive::{Line, Triangle};
use crate::render::{
    FrameBuffers, FrameTarget, PixelSink, RasterStrategy, ScanlineRasterizer, TiledRasterizer,
};
use crate::texture::Sampler;

/// Viewport size and raster strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub strategy: RasterStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            strategy: RasterStrategy::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: RasterStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// The primitives submitted for one frame, in world space.
///
/// Kept by the engine between frames so the vectors keep their capacity. The
/// contents are cleared before every [`GeometryProvider::submit_geometry`].
#[derive(Debug, Default, Clone)]
pub struct FrameGeometry {
    pub triangles: Vec<Triangle>,
    pub lines: Vec<Line>,
}

impl FrameGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }

    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }
}

/// Supplies the primitives of each frame.
pub trait GeometryProvider {
    /// Appends this frame's world-space primitives. `geometry` is empty on entry.
    fn submit_geometry(&mut self, geometry: &mut FrameGeometry);

    /// Texture applied to every triangle of the frame, or `None` for flat fills.
    fn texture(&self) -> Option<&dyn Sampler> {
        None
    }
}

/// Per-frame hooks around rendering.
pub trait FrameCallbacks {
    /// Called before geometry is collected. `elapsed` is the time since the
    /// previous frame.
    fn on_update(&mut self, _camera: &mut Camera, _light: &mut PointLight, _elapsed: Duration) {}

    /// Called once the frame buffers hold the finished frame.
    fn on_render(&mut self, _buffers: &FrameBuffers) {}
}

enum Backend {
    Scanline(ScanlineRasterizer),
    Tiled(TiledRasterizer),
}

impl Backend {
    fn new(strategy: RasterStrategy) -> Result<Self, EngineError> {
        Ok(match strategy {
            RasterStrategy::Scanline => Backend::Scanline(ScanlineRasterizer::new()),
            RasterStrategy::Tiled { tile_size, workers } => {
                Backend::Tiled(TiledRasterizer::new(tile_size, workers)?)
            }
        })
    }
}

pub struct Engine {
    pub camera: Camera,
    pub light: PointLight,
    pipeline: ClipPipeline,
    buffers: FrameBuffers,
    geometry: FrameGeometry,
    backend: Backend,
    strategy: RasterStrategy,
    stats: FrameStats,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let backend = Backend::new(config.strategy)?;
        log::debug!(
            "engine {}x{} using {} rasterization",
            config.width,
            config.height,
            config.strategy
        );

        Ok(Self {
            camera: Camera::default(),
            light: PointLight::default(),
            pipeline: ClipPipeline::new(),
            buffers: FrameBuffers::new(config.width, config.height),
            geometry: FrameGeometry::new(),
            backend,
            strategy: config.strategy,
            stats: FrameStats::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.buffers.width()
    }

    pub fn height(&self) -> u32 {
        self.buffers.height()
    }

    pub fn strategy(&self) -> RasterStrategy {
        self.strategy
    }

    /// Switches raster strategy. On error the previous strategy stays active.
    pub fn set_strategy(&mut self, strategy: RasterStrategy) -> Result<(), EngineError> {
        if strategy != self.strategy {
            self.backend = Backend::new(strategy)?;
            self.strategy = strategy;
            log::debug!("switched to {strategy} rasterization");
        }
        Ok(())
    }

    /// Reallocates the frame buffers. The projection follows the new aspect
    /// ratio from the next frame on.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resize {}x{} -> {}x{}", self.width(), self.height(), width, height);
        self.buffers.resize(width, height);
    }

    /// Depth and id buffers of the last frame.
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Counters of the last frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Screen-space triangles of the last frame.
    pub fn clipped_triangles(&self) -> &[Triangle] {
        self.pipeline.triangles()
    }

    /// Runs one full frame through the application hooks.
    pub fn render_frame<A>(&mut self, app: &mut A, sink: &mut dyn PixelSink, elapsed: Duration) -> FrameStats
    where
        A: GeometryProvider + FrameCallbacks,
    {
        app.on_update(&mut self.camera, &mut self.light, elapsed);

        let mut geometry = std::mem::take(&mut self.geometry);
        geometry.clear();
        app.submit_geometry(&mut geometry);

        let stats = self.render(&geometry, app.texture(), sink);
        self.geometry = geometry;

        app.on_render(&self.buffers);
        stats
    }

    /// Clips and rasterizes `geometry` with the current camera and light.
    ///
    /// Resets the frame buffers first. Only pixels that pass the depth test
    /// reach `sink`, so the caller clears its color buffer if it wants a
    /// background.
    pub fn render(
        &mut self,
        geometry: &FrameGeometry,
        sampler: Option<&dyn Sampler>,
        sink: &mut dyn PixelSink,
    ) -> FrameStats {
        self.buffers.reset();

        let mut stats = self.pipeline.run(
            &self.camera,
            &self.light,
            &geometry.triangles,
            &geometry.lines,
            self.buffers.width(),
            self.buffers.height(),
        );

        let triangles = self.pipeline.triangles();
        let lines = self.pipeline.lines();
        match &mut self.backend {
            Backend::Scanline(rasterizer) => {
                let mut target = FrameTarget::new(&mut self.buffers, sink);
                rasterizer.rasterize(triangles, lines, sampler, &mut target);
            }
            Backend::Tiled(tiled) => {
                stats.tiles_rasterized =
                    tiled.rasterize(triangles, lines, sampler, &mut self.buffers, sink);
            }
        }

        log::trace!(
            "frame: {} triangles in, {} culled, {} rasterized; {} lines in, {} rasterized; {} tiles",
            stats.triangles_submitted,
            stats.triangles_culled,
            stats.triangles_rasterized,
            stats.lines_submitted,
            stats.lines_rasterized,
            stats.tiles_rasterized
        );

        self.stats = stats;
        stats
    }

    /// Id of the object drawn at pixel `(x, y)` in the last frame. `None` for
    /// background, non-pickable primitives and positions outside the viewport.
    pub fn pick(&self, x: i32, y: i32) -> Option<ObjectId> {
        self.buffers.id_at(x, y).filter(|&id| id >= 0)
    }

    /// World-space ray through pixel `(x, y)` for the current camera.
    pub fn screen_ray(&self, x: f32, y: f32) -> Option<Ray> {
        self.camera.screen_ray(x, y, self.width(), self.height())
    }
}
