use rastrum::colors;
use rastrum::prelude::*;

const SIZE: u32 = 100;

struct UvSampler;

/// Encodes `v` in the red channel and `u` in the blue channel.
impl Sampler for UvSampler {
    fn sample(&self, u: f32, v: f32) -> u32 {
        let byte = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        colors::pack(255, byte(v), 0, byte(u))
    }
}

fn engine(strategy: RasterStrategy) -> Engine {
    let mut engine = Engine::new(EngineConfig::new(SIZE, SIZE).with_strategy(strategy)).unwrap();
    engine.camera = Camera::new(Vec3::ZERO).with_projection(Projection::from_degrees(90.0, 0.1, 100.0));
    engine.light = PointLight::new(Vec3::new(0.0, 0.0, -10.0)).with_ambient(1.0);
    engine
}

/// Camera-facing square of side `size` centered on the z axis.
fn square(z: f32, size: f32, id: ObjectId) -> [Triangle; 2] {
    let h = size / 2.0;
    let p = [
        Vec3::new(-h, -h, z),
        Vec3::new(-h, h, z),
        Vec3::new(h, h, z),
        Vec3::new(h, -h, z),
    ];
    [
        Triangle::new([p[0], p[1], p[2]]).with_id(id),
        Triangle::new([p[0], p[2], p[3]]).with_id(id),
    ]
}

/// Floor quad at `y = -1` spanning `z` in `[1.5, 10]`, with `v` growing
/// linearly in world z.
fn floor() -> [Triangle; 2] {
    let uv = |p: Vec3| TexCoord::new((p.x + 1.0) / 2.0, (p.z - 1.5) / 8.5);
    let tri = |a: Vec3, b: Vec3, c: Vec3| {
        Triangle::new([a, b, c])
            .with_texcoords([uv(a), uv(b), uv(c)])
            .with_id(9)
    };
    let near_left = Vec3::new(-1.0, -1.0, 1.5);
    let far_left = Vec3::new(-1.0, -1.0, 10.0);
    let far_right = Vec3::new(1.0, -1.0, 10.0);
    let near_right = Vec3::new(1.0, -1.0, 1.5);
    [
        tri(near_left, far_left, far_right),
        tri(near_left, far_right, near_right),
    ]
}

fn covered(buffers: &FrameBuffers, id: ObjectId) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    for y in 0..SIZE as i32 {
        for x in 0..SIZE as i32 {
            if buffers.id_at(x, y) == Some(id) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[test]
fn square_in_front_of_camera_fills_the_center() {
    let mut engine = engine(RasterStrategy::Scanline);
    let mut geometry = FrameGeometry::new();
    for triangle in square(5.0, 1.0, 3) {
        geometry.push_triangle(triangle);
    }

    let mut pixels = ColorBuffer::new(SIZE, SIZE);
    let stats = engine.render(&geometry, None, &mut pixels);
    assert_eq!(stats.triangles_culled, 0);

    for triangle in engine.clipped_triangles() {
        for vertex in triangle.vertices {
            assert!((0.0..SIZE as f32).contains(&vertex.position.x));
            assert!((0.0..SIZE as f32).contains(&vertex.position.y));
        }
    }

    let hits = covered(engine.buffers(), 3);
    assert!(hits.len() >= 81 && hits.len() <= 121, "{} pixels", hits.len());
    assert!(hits
        .iter()
        .all(|&(x, y)| (44..=56).contains(&x) && (44..=56).contains(&y)));

    assert_eq!(engine.pick(50, 50), Some(3));
    assert_eq!(engine.buffers().id_at(10, 10), Some(NO_OBJECT));
    assert_eq!(engine.pick(10, 10), None);
    assert_eq!(pixels.pixel(50, 50), Some(colors::WHITE));
    assert_eq!(pixels.pixel(10, 10), Some(colors::BACKGROUND));
}

#[test]
fn nearer_surface_wins_in_either_order() {
    let near = square(5.0, 1.0, 1);
    let far = square(8.0, 4.0, 2);

    for order in [[near, far], [far, near]] {
        let mut engine = engine(RasterStrategy::Scanline);
        let mut geometry = FrameGeometry::new();
        for triangle in order.into_iter().flatten() {
            geometry.push_triangle(triangle);
        }
        engine.render(&geometry, None, &mut ColorBuffer::new(SIZE, SIZE));

        assert_eq!(engine.pick(50, 50), Some(1));
        assert_eq!(engine.pick(40, 40), Some(2));
        assert!(engine.buffers().depth_at(50, 50).unwrap() > engine.buffers().depth_at(40, 40).unwrap());
    }
}

#[test]
fn textures_are_sampled_perspective_correct() {
    let mut engine = engine(RasterStrategy::Scanline);
    let mut geometry = FrameGeometry::new();
    for triangle in floor() {
        geometry.push_triangle(triangle);
    }

    let mut pixels = ColorBuffer::new(SIZE, SIZE);
    engine.render(&geometry, Some(&UvSampler), &mut pixels);

    // Row 60 sees the floor at z = 5, column 50 at x = 0.
    assert_eq!(engine.pick(50, 60), Some(9));
    let (_, r, _, b) = colors::channels(pixels.pixel(50, 60).unwrap());
    let expected_v = ((5.0 - 1.5) / 8.5 * 255.0) as i32;
    assert!((r as i32 - expected_v).abs() <= 4, "v channel {r}, expected {expected_v}");
    assert!((b as i32 - 128).abs() <= 4, "u channel {b}");
}

#[test]
fn look_at_target_projects_to_the_center() {
    let mut engine = Engine::new(EngineConfig::new(640, 480)).unwrap();
    let target = Vec3::new(1.0, 0.0, 2.0);
    engine.camera = Camera::looking_at(Vec3::new(3.0, 2.0, -4.0), target);

    let corners = [
        target + Vec3::new(-0.5, -0.5, 0.0),
        target + Vec3::new(0.5, -0.5, 0.0),
        target + Vec3::new(0.0, 0.6, 0.0),
    ];
    let mut geometry = FrameGeometry::new();
    // One of the two windings faces the camera.
    geometry.push_triangle(Triangle::new(corners).with_id(5));
    geometry.push_triangle(Triangle::new([corners[0], corners[2], corners[1]]).with_id(5));

    let stats = engine.render(&geometry, None, &mut ColorBuffer::new(640, 480));
    assert_eq!(stats.triangles_culled, 1);
    assert_eq!(engine.pick(320, 240), Some(5));
}

#[test]
fn lines_are_hidden_behind_nearer_triangles() {
    let mut engine = engine(RasterStrategy::Scanline);
    let mut geometry = FrameGeometry::new();
    for triangle in square(5.0, 1.0, 1) {
        geometry.push_triangle(triangle);
    }
    geometry.push_line(
        Line::new(Vec3::new(-5.0, 0.0, 10.0), Vec3::new(5.0, 0.0, 10.0))
            .with_color(0xFF00FF00)
            .with_id(2),
    );

    let stats = engine.render(&geometry, None, &mut ColorBuffer::new(SIZE, SIZE));
    assert_eq!(stats.lines_rasterized, 1);

    let line_pixels = covered(engine.buffers(), 2);
    assert!(!line_pixels.is_empty());
    assert!(line_pixels.iter().any(|&(x, _)| x < 40));
    assert!(line_pixels.iter().any(|&(x, _)| x > 60));
    assert!(line_pixels
        .iter()
        .all(|&(x, y)| !(46..=54).contains(&x) && (49..=50).contains(&y)));
}

#[test]
fn tiled_strategy_matches_scanline() {
    let mut geometry = FrameGeometry::new();
    for triangle in floor()
        .into_iter()
        .chain(square(5.0, 1.0, 1))
        .chain(square(8.0, 4.0, 2))
    {
        geometry.push_triangle(triangle);
    }
    geometry.push_line(Line::new(Vec3::new(-5.0, 0.3, 10.0), Vec3::new(5.0, -2.0, 6.0)).with_id(4));

    let mut scanline = engine(RasterStrategy::Scanline);
    let mut scanline_pixels = ColorBuffer::new(SIZE, SIZE);
    scanline.render(&geometry, Some(&UvSampler), &mut scanline_pixels);

    let mut tiled = engine(RasterStrategy::Tiled {
        tile_size: 16,
        workers: 2,
    });
    let mut tiled_pixels = ColorBuffer::new(SIZE, SIZE);
    let stats = tiled.render(&geometry, Some(&UvSampler), &mut tiled_pixels);

    assert!(stats.tiles_rasterized > 0);
    assert_eq!(scanline.buffers().ids(), tiled.buffers().ids());
    assert_eq!(scanline_pixels.pixels(), tiled_pixels.pixels());
}
