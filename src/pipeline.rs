//! World-space primitives to screen-space primitives.
//!
//! Per frame the pipeline runs, in order:
//!
//! 1. back-face culling and flat shading in world space,
//! 2. the view transform,
//! 3. clipping against the near plane,
//! 4. projection, perspective divide and the viewport mapping,
//! 5. clipping against the four screen edges.
//!
//! The output lists are owned by the pipeline and reused across frames. Their
//! contents are replaced on every [`ClipPipeline::run`].

use std::collections::VecDeque;

use crate::camera::{self, Camera, W_EPSILON};
use crate::clipping::{Clip, Plane};
use crate::colors;
use crate::light::PointLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::primitive::{Line, Triangle, Vertex};

/// Counters for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles_submitted: usize,
    pub lines_submitted: usize,
    /// Back-facing or zero-area triangles.
    pub triangles_culled: usize,
    /// Screen-space triangles handed to the rasterizer.
    pub triangles_rasterized: usize,
    pub lines_rasterized: usize,
    /// Tiles with work, 0 for the single-threaded strategy.
    pub tiles_rasterized: usize,
}

/// The four screen edges as inward-facing planes.
fn screen_planes(width: u32, height: u32) -> [Plane; 4] {
    let (w, h) = (width as f32, height as f32);
    [
        Plane::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
        Plane::new(Vec3::new(w, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        Plane::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
        Plane::new(Vec3::new(0.0, h, 0.0), Vec3::new(0.0, -1.0, 0.0)),
    ]
}

/// Projection and viewport for one frame.
struct Viewport {
    projection: Mat4,
    width: u32,
    height: u32,
}

impl Viewport {
    /// View space to screen space. After this `texcoord` holds
    /// `(u/w, v/w, 1/w)`. Returns `None` when `w` is too small to divide by.
    fn project(&self, vertex: &Vertex) -> Option<Vertex> {
        let clip = Vec4::from(vertex.position) * self.projection;
        let ndc = clip.perspective_divide(W_EPSILON)?;
        let inv_w = 1.0 / clip.w;
        let (x, y) = camera::ndc_to_screen(ndc.x, ndc.y, self.width, self.height);

        let mut out = *vertex;
        out.position = Vec3::new(x, y, ndc.z);
        out.texcoord.u *= inv_w;
        out.texcoord.v *= inv_w;
        out.texcoord.w = inv_w;
        Some(out)
    }

    fn project_all<const N: usize>(&self, vertices: &[Vertex; N]) -> Option<[Vertex; N]> {
        let mut out = *vertices;
        for (dst, src) in out.iter_mut().zip(vertices) {
            *dst = self.project(src)?;
        }
        Some(out)
    }
}

/// Drains `queue` once per plane so a primitive can fan out into several,
/// then appends the survivors to `out`.
fn clip_to_screen<T: Clip>(queue: &mut VecDeque<T>, planes: &[Plane], seed: T, out: &mut Vec<T>) {
    queue.clear();
    queue.push_back(seed);
    for plane in planes {
        for _ in 0..queue.len() {
            if let Some(primitive) = queue.pop_front() {
                queue.extend(primitive.clip_against_plane(plane));
            }
        }
    }
    out.extend(queue.drain(..));
}

/// Reusable scratch space and output for the clip stages.
#[derive(Debug, Default)]
pub struct ClipPipeline {
    triangles: Vec<Triangle>,
    lines: Vec<Line>,
    triangle_queue: VecDeque<Triangle>,
    line_queue: VecDeque<Line>,
}

impl ClipPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen-space triangles produced by the last run.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Screen-space lines produced by the last run.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Runs every stage for one frame on a `width` x `height` viewport.
    pub fn run(
        &mut self,
        camera: &Camera,
        light: &PointLight,
        triangles: &[Triangle],
        lines: &[Line],
        width: u32,
        height: u32,
    ) -> FrameStats {
        self.triangles.clear();
        self.lines.clear();

        let mut stats = FrameStats {
            triangles_submitted: triangles.len(),
            lines_submitted: lines.len(),
            ..FrameStats::default()
        };

        if width == 0 || height == 0 {
            return stats;
        }

        let view = camera.view_matrix();
        let viewport = Viewport {
            projection: camera.projection_matrix(camera::aspect(width, height)),
            width,
            height,
        };
        let near = Plane::new(
            Vec3::new(0.0, 0.0, camera.projection.z_near()),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let screen = screen_planes(width, height);

        for triangle in triangles {
            let Some(normal) = triangle.normal() else {
                stats.triangles_culled += 1;
                continue;
            };
            if normal.dot(triangle.vertices[0].position - camera.position) >= 0.0 {
                stats.triangles_culled += 1;
                continue;
            }

            let shade = light.intensity(normal, triangle.centroid());
            let mut in_view = triangle.with_color(colors::scale(triangle.color, shade));
            for vertex in in_view.vertices.iter_mut() {
                vertex.position = vertex.position * view;
            }

            for clipped in in_view.clip_against_plane(&near) {
                let Some(projected) = viewport.project_all(&clipped.vertices) else {
                    continue;
                };
                clip_to_screen(
                    &mut self.triangle_queue,
                    &screen,
                    clipped.with_vertices(projected),
                    &mut self.triangles,
                );
            }
        }

        for line in lines {
            let mut in_view = *line;
            for vertex in in_view.vertices.iter_mut() {
                vertex.position = vertex.position * view;
            }

            for clipped in in_view.clip_against_plane(&near) {
                let Some(projected) = viewport.project_all(&clipped.vertices) else {
                    continue;
                };
                clip_to_screen(
                    &mut self.line_queue,
                    &screen,
                    clipped.with_vertices(projected),
                    &mut self.lines,
                );
            }
        }

        stats.triangles_rasterized = self.triangles.len();
        stats.lines_rasterized = self.lines.len();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO).with_projection(Projection::from_degrees(90.0, 0.1, 100.0))
    }

    fn facing_camera(z: f32) -> Triangle {
        Triangle::new([
            Vec3::new(-0.5, -0.5, z),
            Vec3::new(-0.5, 0.5, z),
            Vec3::new(0.5, 0.5, z),
        ])
    }

    #[test]
    fn back_faces_and_degenerates_are_culled() {
        let mut pipeline = ClipPipeline::new();
        let front = facing_camera(5.0);
        let [a, b, c] = front.points();
        let back = Triangle::new([a, c, b]);
        let flat = Triangle::new([a, a, b]);

        let stats = pipeline.run(&camera(), &PointLight::default(), &[front, back, flat], &[], 100, 100);
        assert_eq!(stats.triangles_culled, 2);
        assert_eq!(pipeline.triangles().len(), 1);
    }

    #[test]
    fn projection_stores_reciprocal_depth() {
        let mut pipeline = ClipPipeline::new();
        pipeline.run(&camera(), &PointLight::default(), &[facing_camera(5.0)], &[], 100, 100);

        let out = pipeline.triangles()[0];
        for vertex in out.vertices {
            assert_relative_eq!(vertex.texcoord.w, 0.2, epsilon = 1e-5);
            assert!((44.9..=55.1).contains(&vertex.position.x));
            assert!((44.9..=55.1).contains(&vertex.position.y));
        }
        // (-0.5, -0.5) lands bottom-right after the axis flip
        assert_relative_eq!(out.vertices[0].position.x, 55.0, epsilon = 1e-3);
        assert_relative_eq!(out.vertices[0].position.y, 55.0, epsilon = 1e-3);
    }

    #[test]
    fn shading_is_applied_to_the_color() {
        let mut pipeline = ClipPipeline::new();
        // Light behind the camera's view of the face: only ambient applies.
        let light = PointLight::new(Vec3::new(0.0, 0.0, 50.0)).with_ambient(0.5);
        let face = facing_camera(5.0).with_color(0xFFC86432);
        pipeline.run(&camera(), &light, &[face], &[], 100, 100);
        assert_eq!(pipeline.triangles()[0].color, colors::scale(0xFFC86432, 0.5));
    }

    #[test]
    fn geometry_behind_the_near_plane_is_removed() {
        let mut pipeline = ClipPipeline::new();
        let behind = facing_camera(-5.0);
        let line = Line::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -3.0));
        let stats = pipeline.run(&camera(), &PointLight::default(), &[], &[line], 100, 100);
        assert_eq!(stats.lines_rasterized, 0);

        // A face behind the camera faces it too once mirrored; either way nothing survives.
        let [a, b, c] = behind.points();
        pipeline.run(
            &camera(),
            &PointLight::default(),
            &[behind, Triangle::new([a, c, b])],
            &[],
            100,
            100,
        );
        assert!(pipeline.triangles().is_empty());
    }

    #[test]
    fn output_stays_inside_the_viewport() {
        let mut pipeline = ClipPipeline::new();
        // Much larger than the view frustum at z = 2.
        let big = Triangle::new([
            Vec3::new(-20.0, -20.0, 2.0),
            Vec3::new(-20.0, 20.0, 2.0),
            Vec3::new(20.0, 20.0, 2.0),
        ]);
        let line = Line::new(Vec3::new(-20.0, 0.3, 2.0), Vec3::new(20.0, -0.3, 2.0));
        let stats = pipeline.run(&camera(), &PointLight::default(), &[big], &[line], 80, 60);

        assert!(stats.triangles_rasterized >= 1);
        assert_eq!(stats.lines_rasterized, 1);
        let points = pipeline
            .triangles()
            .iter()
            .flat_map(|t| t.points())
            .chain(pipeline.lines().iter().flat_map(|l| l.vertices.map(|v| v.position)));
        for p in points {
            assert!(p.x >= -1e-3 && p.x <= 80.0 + 1e-3, "x = {}", p.x);
            assert!(p.y >= -1e-3 && p.y <= 60.0 + 1e-3, "y = {}", p.y);
        }
    }

    #[test]
    fn scratch_is_reset_between_frames() {
        let mut pipeline = ClipPipeline::new();
        pipeline.run(&camera(), &PointLight::default(), &[facing_camera(5.0)], &[], 100, 100);
        pipeline.run(&camera(), &PointLight::default(), &[], &[], 100, 100);
        assert!(pipeline.triangles().is_empty());
        assert!(pipeline.lines().is_empty());
    }
}
