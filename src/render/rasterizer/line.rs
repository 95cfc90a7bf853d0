//! Depth-tested line drawing.

use crate::primitive::Line;
use crate::render::target::RasterTarget;

/// Draws a screen-space line using Bresenham's line algorithm with depth testing.
///
/// Bresenham's algorithm steps along the major axis one pixel at a time and
/// tracks an integer error term to decide when to also step along the minor
/// axis. Both can happen in one iteration, which gives a diagonal step.
///
/// The reciprocal depth `1/w` is interpolated with `t = step / steps` and goes
/// through the same strict depth test as triangle fills.
pub fn draw_line<T: RasterTarget>(line: &Line, target: &mut T) {
    let [a, b] = &line.vertices;
    let (x0, y0, w0) = (a.position.x as i32, a.position.y as i32, a.texcoord.w);
    let (x1, y1, w1) = (b.position.x as i32, b.position.y as i32, b.texcoord.w);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    // Total number of steps (max of dx, dy)
    let steps = dx.max(dy);
    if steps == 0 {
        plot(target, x0, y0, w0.max(w1), line);
        return;
    }

    let x_incr_direction = if x0 < x1 { 1 } else { -1 };
    let y_incr_direction = if y0 < y1 { 1 } else { -1 };

    // Positive error favors x movement, negative favors y.
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;
    let mut step = 0;

    loop {
        let t = step as f32 / steps as f32;
        plot(target, x, y, w0 + t * (w1 - w0), line);

        if x == x1 && y == y1 {
            break;
        }

        step += 1;

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += x_incr_direction;
        }
        if e2 < dx {
            err += dx;
            y += y_incr_direction;
        }
    }
}

#[inline]
fn plot<T: RasterTarget>(target: &mut T, x: i32, y: i32, depth: f32, line: &Line) {
    if target.passes_depth(x, y, depth) {
        target.write(x, y, depth, line.id, line.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;
    use crate::render::framebuffer::FrameBuffers;
    use crate::render::sink::ColorBuffer;
    use crate::render::target::FrameTarget;

    fn screen_line(start: (f32, f32), end: (f32, f32), inv_w: f32, id: i32) -> Line {
        let mut line = Line::new(
            Vec3::new(start.0, start.1, 0.5),
            Vec3::new(end.0, end.1, 0.5),
        )
        .with_id(id)
        .with_color(0xFF00FFFF);
        for vertex in line.vertices.iter_mut() {
            vertex.texcoord.w = inv_w;
        }
        line
    }

    #[test]
    fn covers_every_step_including_endpoints() {
        let mut buffers = FrameBuffers::new(10, 10);
        let mut pixels = ColorBuffer::new(10, 10);
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            draw_line(&screen_line((1.0, 1.0), (8.0, 4.0), 0.5, 2), &mut target);
        }
        assert_eq!(buffers.ids().iter().filter(|&&id| id == 2).count(), 8);
        assert_eq!(buffers.id_at(1, 1), Some(2));
        assert_eq!(buffers.id_at(8, 4), Some(2));
        assert_eq!(pixels.pixel(8, 4), Some(0xFF00FFFF));
    }

    #[test]
    fn steep_and_reversed_lines() {
        let mut buffers = FrameBuffers::new(10, 10);
        let mut pixels = ColorBuffer::new(10, 10);
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            draw_line(&screen_line((7.0, 9.0), (5.0, 0.0), 0.5, 3), &mut target);
        }
        // one pixel per row
        for y in 0..10 {
            let in_row = (0..10).filter(|&x| buffers.id_at(x, y) == Some(3)).count();
            assert_eq!(in_row, 1, "row {y}");
        }
    }

    #[test]
    fn single_pixel_line() {
        let mut buffers = FrameBuffers::new(4, 4);
        let mut pixels = ColorBuffer::new(4, 4);
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            draw_line(&screen_line((2.2, 2.7), (2.9, 2.1), 0.5, 1), &mut target);
        }
        assert_eq!(buffers.ids().iter().filter(|&&id| id == 1).count(), 1);
        assert_eq!(buffers.id_at(2, 2), Some(1));
    }

    #[test]
    fn occluded_pixels_are_not_written() {
        let mut buffers = FrameBuffers::new(10, 1);
        let mut pixels = ColorBuffer::new(10, 1);
        {
            let mut target = FrameTarget::new(&mut buffers, &mut pixels);
            // something closer already covers x in 0..5
            for x in 0..5 {
                target.write(x, 0, 0.9, 7, 0xFF111111);
            }
            draw_line(&screen_line((0.0, 0.0), (9.0, 0.0), 0.5, 1), &mut target);
        }
        for x in 0..5 {
            assert_eq!(buffers.id_at(x, 0), Some(7));
        }
        for x in 5..10 {
            assert_eq!(buffers.id_at(x, 0), Some(1));
        }
    }
}
