//! Software drawing primitives shared by the effects and the overlay.
//!
//! Everything here clips to frame bounds; feeding coordinates outside the
//! frame is safe and simply draws nothing there.

use crate::video::Frame;

/// Put a pixel if (x, y) is inside the frame.
#[inline]
pub fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if frame.in_bounds(x, y) {
        frame.set_pixel(x as u32, y as u32, color);
    }
}

/// Thin 1-pixel line between (x0, y0) and (x1, y1) using Bresenham.
pub fn line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 3]) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(frame, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Line with round caps: stamps a filled disc at every Bresenham step.
pub fn thick_line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, thickness: u32, color: [u8; 3]) {
    let radius = (thickness / 2) as i32;
    if radius == 0 {
        line(frame, x0, y0, x1, y1, color);
        return;
    }
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        filled_circle(frame, x0, y0, radius, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Filled disc of the given radius centered at (cx, cy).
pub fn filled_circle(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    if radius < 0 {
        return;
    }
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Circle outline with the given stroke thickness, centered on the radius.
pub fn circle_outline(frame: &mut Frame, cx: i32, cy: i32, radius: i32, thickness: i32, color: [u8; 3]) {
    if radius <= 0 {
        return;
    }
    let half = (thickness / 2).max(1);
    let inner = (radius - half).max(0);
    let outer = radius + half;
    let inner_sq = inner * inner;
    let outer_sq = outer * outer;
    for dy in -outer..=outer {
        for dx in -outer..=outer {
            let dist_sq = dx * dx + dy * dy;
            if dist_sq >= inner_sq && dist_sq <= outer_sq {
                put_pixel(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Clip a square of the given half-size centered at (cx, cy) to the frame.
///
/// Returns (left, top, right, bottom) with exclusive right/bottom, or None
/// when the clipped region is empty.
pub fn clipped_square(frame: &Frame, cx: i32, cy: i32, half: i32) -> Option<(u32, u32, u32, u32)> {
    let left = (cx - half).max(0);
    let top = (cy - half).max(0);
    let right = (cx + half).min(frame.width() as i32);
    let bottom = (cy + half).min(frame.height() as i32);
    if left < right && top < bottom {
        Some((left as u32, top as u32, right as u32, bottom as u32))
    } else {
        None
    }
}
