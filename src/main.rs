//! Demo: a row of spinning textured cubes over a line grid.
//!
//! WASD / arrows move, Q/E turn, left click picks a cube, T switches between
//! scanline and tiled rasterization, X toggles the texture. An image path may
//! be passed as the first argument to replace the checkerboard texture.

mod window;

use std::error::Error;
use std::time::Duration;

use rastrum::colors;
use rastrum::prelude::*;
use rastrum::TextureError;
use sdl2::pixels::PixelFormatEnum;

use window::{FrameLimiter, InputState, WindowEvent};

const MOVE_SPEED: f32 = 4.0;
const TURN_SPEED: f32 = 1.5;
const SPIN_SPEED: f32 = 0.8;
const CUBE_COUNT: usize = 3;
const GRID_HALF_EXTENT: i32 = 6;

/// Outward face normal and two in-plane axes with `a x b = normal`.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
];

struct Cube {
    id: ObjectId,
    position: Vec3,
    color: u32,
}

struct Scene {
    cubes: Vec<Cube>,
    texture: Texture,
    textured: bool,
    angle: f32,
    input: InputState,
    selected: Option<ObjectId>,
}

impl Scene {
    fn new(texture: Texture) -> Self {
        let mut ids = IdAllocator::new();
        let palette = [0xFFFFFFFF, 0xFFFFB0B0, 0xFFB0C8FF];
        let cubes = (0..CUBE_COUNT)
            .map(|i| Cube {
                id: ids.allocate(),
                position: Vec3::new((i as f32 - 1.0) * 2.0, 0.0, 0.0),
                color: palette[i % palette.len()],
            })
            .collect();

        Self {
            cubes,
            texture,
            textured: true,
            angle: 0.0,
            input: InputState::default(),
            selected: None,
        }
    }

    fn push_cube(&self, cube: &Cube, geometry: &mut FrameGeometry) {
        let model = Mat4::rotation_x(self.angle * 0.5)
            * Mat4::rotation_y(self.angle)
            * Mat4::translation(cube.position.x, cube.position.y, cube.position.z);
        let color = if self.selected == Some(cube.id) {
            0xFFFFE060
        } else {
            cube.color
        };

        for (normal, a, b) in CUBE_FACES {
            let (c, a, b) = (normal * 0.5, a * 0.5, b * 0.5);
            let q = [c - a - b, c + a - b, c + a + b, c - a + b].map(|p| p * model);
            let uv = [
                TexCoord::new(0.0, 1.0),
                TexCoord::new(1.0, 1.0),
                TexCoord::new(1.0, 0.0),
                TexCoord::new(0.0, 0.0),
            ];
            for [i, j, k] in [[0, 1, 2], [0, 2, 3]] {
                geometry.push_triangle(
                    Triangle::new([q[i], q[j], q[k]])
                        .with_texcoords([uv[i], uv[j], uv[k]])
                        .with_color(color)
                        .with_id(cube.id),
                );
            }
        }
    }
}

impl GeometryProvider for Scene {
    fn submit_geometry(&mut self, geometry: &mut FrameGeometry) {
        for cube in &self.cubes {
            self.push_cube(cube, geometry);
        }

        let extent = GRID_HALF_EXTENT as f32;
        for i in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
            let offset = i as f32;
            let color = if i == 0 { 0xFF5A8CFF } else { 0xFF505050 };
            geometry.push_line(
                Line::new(Vec3::new(offset, -1.0, -extent), Vec3::new(offset, -1.0, extent))
                    .with_color(color),
            );
            geometry.push_line(
                Line::new(Vec3::new(-extent, -1.0, offset), Vec3::new(extent, -1.0, offset))
                    .with_color(color),
            );
        }
    }

    fn texture(&self) -> Option<&dyn Sampler> {
        self.textured.then_some(&self.texture as &dyn Sampler)
    }
}

impl FrameCallbacks for Scene {
    fn on_update(&mut self, camera: &mut Camera, _light: &mut PointLight, elapsed: Duration) {
        let dt = elapsed.as_secs_f32();
        self.angle += SPIN_SPEED * dt;

        let input = &self.input;
        let step = MOVE_SPEED * dt;
        if input.forward {
            camera.move_forward(step);
        }
        if input.back {
            camera.move_forward(-step);
        }
        if input.right {
            camera.strafe(step);
        }
        if input.left {
            camera.strafe(-step);
        }
        if input.turn_right {
            camera.rotate_yaw(TURN_SPEED * dt);
        }
        if input.turn_left {
            camera.rotate_yaw(-TURN_SPEED * dt);
        }
    }

    fn on_render(&mut self, buffers: &FrameBuffers) {
        if let Some((x, y)) = self.input.click.take() {
            self.selected = buffers.id_at(x, y).filter(|&id| id >= 0);
            log::info!("picked {:?} at ({x}, {y})", self.selected);
        }
    }
}

fn load_texture() -> Result<Texture, TextureError> {
    match std::env::args().nth(1) {
        Some(path) => Texture::from_file(&path).or_else(|err| {
            log::warn!("could not load {path}: {err}, using checkerboard");
            Texture::checkerboard(8, colors::WHITE, 0xFF404040)
        }),
        None => Texture::checkerboard(8, colors::WHITE, 0xFF404040),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let timer = sdl_context.timer()?;

    let sdl_window = video_subsystem
        .window("Rastrum", window::WINDOW_WIDTH, window::WINDOW_HEIGHT)
        .position_centered()
        .resizable()
        .build()?;

    let mut canvas = sdl_window.into_canvas().build()?;
    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;

    let (mut width, mut height) = (window::WINDOW_WIDTH, window::WINDOW_HEIGHT);
    let mut screen = texture_creator.create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)?;

    let mut engine = Engine::new(EngineConfig::new(width, height).with_strategy(RasterStrategy::tiled()))?;
    engine.camera = Camera::looking_at(Vec3::new(0.0, 1.5, -6.0), Vec3::ZERO);
    engine.light = PointLight::new(Vec3::new(-4.0, 6.0, -8.0));

    let mut scene = Scene::new(load_texture()?);
    let mut pixels = ColorBuffer::new(width, height);
    let mut limiter = FrameLimiter::new(&timer);

    loop {
        match window::poll_events(&mut event_pump, &mut scene.input) {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                width = w;
                height = h;
                engine.resize(width, height);
                pixels.resize(width, height);
                screen = texture_creator.create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)?;
            }
            WindowEvent::ToggleStrategy => {
                let next = match engine.strategy() {
                    RasterStrategy::Scanline => RasterStrategy::tiled(),
                    RasterStrategy::Tiled { .. } => RasterStrategy::Scanline,
                };
                engine.set_strategy(next)?;
                log::info!("rasterizer: {}", engine.strategy());
            }
            WindowEvent::ToggleTexture => scene.textured = !scene.textured,
            WindowEvent::None => {}
        }

        let elapsed = limiter.wait_and_get_delta(&timer);

        pixels.clear(colors::BACKGROUND);
        engine.render_frame(&mut scene, &mut pixels, elapsed);

        screen.update(None, pixels.as_bytes(), (width * 4) as usize)?;
        canvas.clear();
        canvas.copy(&screen, None, None)?;
        canvas.present();
    }

    Ok(())
}
