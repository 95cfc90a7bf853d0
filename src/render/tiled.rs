//! Tile-parallel rasterization.
//!
//! The screen is cut into square tiles. Every screen-space primitive is
//! appended to the bin of each tile its bounding box overlaps, so a primitive
//! crossing a tile edge is rasterized once per tile, clipped to that tile by
//! the target bounds. One job per non-empty tile runs on a fixed-size worker
//! pool; jobs own their tile's depth, id and color cells and share nothing
//! mutable. The calling thread waits for all of them, then copies the written
//! cells into the frame buffers and the pixel sink.
//!
//! Within a tile primitives are drawn in submission order, so the result is
//! identical to single-threaded rasterization.

use std::ops::RangeInclusive;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::framebuffer::FrameBuffers;
use super::rasterizer::{draw_line, ScanlineRasterizer};
use super::sink::PixelSink;
use super::target::{PixelRect, RasterTarget};
use crate::colors;
use crate::error::EngineError;
use crate::id::{ObjectId, NO_OBJECT};
use crate::math::vec3::Vec3;
use crate::primitive::{Line, Triangle};
use crate::texture::Sampler;

/// Tile edge length used when none is configured.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Tile-local depth, id and color cells.
#[derive(Debug)]
pub struct TileTarget {
    rect: PixelRect,
    depth: Vec<f32>,
    ids: Vec<ObjectId>,
    color: Vec<u32>,
}

impl TileTarget {
    pub fn new(rect: PixelRect) -> Self {
        let size = rect.width() * rect.height();
        Self {
            rect,
            depth: vec![0.0; size],
            ids: vec![NO_OBJECT; size],
            color: vec![colors::BLACK; size],
        }
    }

    #[inline]
    fn local_index(&self, x: i32, y: i32) -> Option<usize> {
        if self.rect.contains(x, y) {
            let local_x = (x - self.rect.min_x) as usize;
            let local_y = (y - self.rect.min_y) as usize;
            Some(local_y * self.rect.width() + local_x)
        } else {
            None
        }
    }

    /// Copies every written cell into the frame. Cells nothing reached keep
    /// depth 0 and are skipped.
    pub fn flush(&self, buffers: &mut FrameBuffers, sink: &mut dyn PixelSink) {
        let width = self.rect.width();
        for (i, &depth) in self.depth.iter().enumerate() {
            if depth <= 0.0 {
                continue;
            }
            let x = self.rect.min_x + (i % width) as i32;
            let y = self.rect.min_y + (i / width) as i32;
            buffers.store(x, y, depth, self.ids[i]);
            sink.set_pixel(x, y, self.color[i]);
        }
    }
}

impl RasterTarget for TileTarget {
    #[inline]
    fn bounds(&self) -> PixelRect {
        self.rect
    }

    #[inline]
    fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.local_index(x, y).map(|i| self.depth[i])
    }

    #[inline]
    fn write(&mut self, x: i32, y: i32, depth: f32, id: ObjectId, color: u32) {
        if let Some(i) = self.local_index(x, y) {
            self.depth[i] = depth;
            self.ids[i] = id;
            self.color[i] = color;
        }
    }
}

/// Primitive indices binned to one tile.
#[derive(Debug, Default, Clone)]
struct TileBin {
    triangles: Vec<usize>,
    lines: Vec<usize>,
}

impl TileBin {
    fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }
}

/// Tracks which primitives need to be rendered into which tiles.
#[derive(Debug, Default)]
pub struct TileGrid {
    tile_size: u32,
    width: u32,
    height: u32,
    tiles_x: u32,
    bins: Vec<TileBin>,
}

impl TileGrid {
    pub fn new(tile_size: u32, width: u32, height: u32) -> Self {
        let tile_size = tile_size.max(1);
        let tiles_x = width.div_ceil(tile_size);
        let tiles_y = height.div_ceil(tile_size);
        Self {
            tile_size,
            width,
            height,
            tiles_x,
            bins: vec![TileBin::default(); tiles_x as usize * tiles_y as usize],
        }
    }

    pub fn tile_count(&self) -> usize {
        self.bins.len()
    }

    /// Frame rectangle covered by tile `index`. Edge tiles may be smaller.
    pub fn tile_rect(&self, index: usize) -> PixelRect {
        let tx = index as u32 % self.tiles_x.max(1);
        let ty = index as u32 / self.tiles_x.max(1);
        let min_x = tx * self.tile_size;
        let min_y = ty * self.tile_size;
        PixelRect::new(
            min_x as i32,
            min_y as i32,
            (min_x + self.tile_size).min(self.width) as i32,
            (min_y + self.tile_size).min(self.height) as i32,
        )
    }

    /// Clear all bins (reuse allocations)
    fn clear(&mut self) {
        for bin in &mut self.bins {
            bin.triangles.clear();
            bin.lines.clear();
        }
    }

    /// Tile columns and rows overlapped by the bounding box of `points`,
    /// clamped to the frame. `None` when the box misses the frame.
    fn tile_span(&self, points: &[Vec3]) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let x0 = (min_x.floor() as i32).max(0);
        let y0 = (min_y.floor() as i32).max(0);
        let x1 = (max_x.floor() as i32).min(self.width as i32 - 1);
        let y1 = (max_y.floor() as i32).min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }

        let size = self.tile_size as usize;
        Some((
            x0 as usize / size..=x1 as usize / size,
            y0 as usize / size..=y1 as usize / size,
        ))
    }

    fn bin(&mut self, triangles: &[Triangle], lines: &[Line]) {
        self.clear();
        let tiles_x = self.tiles_x as usize;
        for (i, triangle) in triangles.iter().enumerate() {
            if let Some((columns, rows)) = self.tile_span(&triangle.points()) {
                for ty in rows {
                    for tx in columns.clone() {
                        self.bins[ty * tiles_x + tx].triangles.push(i);
                    }
                }
            }
        }
        for (i, line) in lines.iter().enumerate() {
            let points = line.vertices.map(|v| v.position);
            if let Some((columns, rows)) = self.tile_span(&points) {
                for ty in rows {
                    for tx in columns.clone() {
                        self.bins[ty * tiles_x + tx].lines.push(i);
                    }
                }
            }
        }
    }
}

/// Rasterizes screen-space primitives tile by tile on a dedicated pool.
pub struct TiledRasterizer {
    pool: ThreadPool,
    grid: TileGrid,
    tile_size: u32,
    rasterizer: ScanlineRasterizer,
}

impl std::fmt::Debug for TiledRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiledRasterizer")
            .field("tile_size", &self.tile_size)
            .field("workers", &self.pool.current_num_threads())
            .finish()
    }
}

impl TiledRasterizer {
    /// Builds the worker pool. `workers == 0` lets rayon pick one thread per
    /// core.
    pub fn new(tile_size: u32, workers: usize) -> Result<Self, EngineError> {
        if tile_size == 0 {
            return Err(EngineError::ZeroTileSize);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rastrum-tile-{i}"))
            .build()?;
        log::debug!(
            "tiled rasterizer: {}px tiles on {} workers",
            tile_size,
            pool.current_num_threads()
        );
        Ok(Self {
            pool,
            grid: TileGrid::default(),
            tile_size,
            rasterizer: ScanlineRasterizer::new(),
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Rasterizes one frame and composites it into `buffers` and `sink`.
    /// Returns the number of tiles that had work.
    pub fn rasterize(
        &mut self,
        triangles: &[Triangle],
        lines: &[Line],
        sampler: Option<&dyn Sampler>,
        buffers: &mut FrameBuffers,
        sink: &mut dyn PixelSink,
    ) -> usize {
        let (width, height) = (buffers.width(), buffers.height());
        if self.grid.width != width || self.grid.height != height || self.grid.tile_size != self.tile_size {
            self.grid = TileGrid::new(self.tile_size, width, height);
        }
        self.grid.bin(triangles, lines);

        let grid = &self.grid;
        let rasterizer = self.rasterizer;
        let work: Vec<usize> = (0..grid.tile_count())
            .filter(|&i| !grid.bins[i].is_empty())
            .collect();

        // Returns once every tile job has finished.
        let tiles: Vec<TileTarget> = self.pool.install(|| {
            work.par_iter()
                .map(|&index| {
                    let bin = &grid.bins[index];
                    let mut tile = TileTarget::new(grid.tile_rect(index));
                    for &i in &bin.triangles {
                        rasterizer.draw_triangle(&triangles[i], sampler, &mut tile);
                    }
                    for &i in &bin.lines {
                        draw_line(&lines[i], &mut tile);
                    }
                    tile
                })
                .collect()
        });

        for tile in &tiles {
            tile.flush(buffers, sink);
        }
        tiles.len()
    }
}
