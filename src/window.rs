//! SDL2 input handling and frame pacing for the demo binary.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: u64 = 1000 / FPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
    ToggleStrategy,
    ToggleTexture,
}

/// Keys held down plus the last unhandled click.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub click: Option<(i32, i32)>,
}

impl InputState {
    fn set_key(&mut self, key: Keycode, down: bool) {
        match key {
            Keycode::W | Keycode::Up => self.forward = down,
            Keycode::S | Keycode::Down => self.back = down,
            Keycode::A => self.left = down,
            Keycode::D => self.right = down,
            Keycode::Q | Keycode::Left => self.turn_left = down,
            Keycode::E | Keycode::Right => self.turn_right = down,
            _ => {}
        }
    }
}

/// Drains pending SDL events into `input`. Returns the most recent event the
/// main loop has to act on.
pub fn poll_events(event_pump: &mut sdl2::EventPump, input: &mut InputState) -> WindowEvent {
    let mut result = WindowEvent::None;
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => return WindowEvent::Quit,
            Event::KeyDown {
                keycode: Some(Keycode::T),
                repeat: false,
                ..
            } => result = WindowEvent::ToggleStrategy,
            Event::KeyDown {
                keycode: Some(Keycode::X),
                repeat: false,
                ..
            } => result = WindowEvent::ToggleTexture,
            Event::KeyDown {
                keycode: Some(key), ..
            } => input.set_key(key, true),
            Event::KeyUp {
                keycode: Some(key), ..
            } => input.set_key(key, false),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => input.click = Some((x, y)),
            Event::Window {
                win_event: sdl2::event::WindowEvent::Resized(w, h),
                ..
            } => result = WindowEvent::Resize(w.max(1) as u32, h.max(1) as u32),
            _ => {}
        }
    }
    result
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(timer: &sdl2::TimerSubsystem) -> Self {
        Self {
            previous_frame_time: timer.ticks64(),
        }
    }

    /// Sleeps off the rest of the frame budget and returns the time since the
    /// previous call.
    pub fn wait_and_get_delta(&mut self, timer: &sdl2::TimerSubsystem) -> Duration {
        let mut current_time = timer.ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME {
            std::thread::sleep(Duration::from_millis(FRAME_TARGET_TIME - delta_time));
            current_time = timer.ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        Duration::from_millis(delta_time)
    }
}
