//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for the shapes a raster series needs:
//! line segments of arbitrary width and small filled circles.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a one pixel wide line using Bresenham's algorithm (non-antialiased).
///
/// # Arguments
///
/// * `fb` - Target framebuffer
/// * `x0`, `y0` - Start coordinates
/// * `x1`, `y1` - End coordinates
/// * `color` - Line color
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    walk_line(x0, y0, x1, y1, |x, y| {
        if x >= 0 && y >= 0 {
            fb.paint_pixel(x as u32, y as u32, color);
        }
    });
}

/// Draw a line of the given width.
///
/// Widths of 1.5 or less fall back to [`draw_line`]. Wider lines stamp a
/// square brush centred on every Bresenham step, which is visually equivalent
/// to a butt-capped stroke at raster resolution.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    width: f32,
    color: Rgba,
) {
    let size = width.round().max(1.0) as i32;
    let Some((x0, y0, x1, y1)) = clip_segment(fb, x0, y0, x1, y1, size) else {
        return;
    };

    if width <= 1.5 {
        draw_line(fb, x0, y0, x1, y1, color);
        return;
    }

    let offset = size / 2;
    walk_line(x0, y0, x1, y1, |x, y| {
        fill_clipped(fb, x - offset, y - offset, size, size, color);
    });
}

/// Draw connected segments through `points`.
///
/// A single point draws nothing; there is no segment to stroke.
pub fn draw_polyline(fb: &mut Framebuffer, points: &[(i32, i32)], width: f32, color: Rgba) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_thick_line(fb, x0, y0, x1, y1, width, color);
    }
}

/// Clip a segment to the framebuffer grown by `pad` pixels (Liang-Barsky).
///
/// Returns `None` when the segment lies entirely outside. Endpoints far off
/// screen would otherwise make the Bresenham walk arbitrarily long.
fn clip_segment(
    fb: &Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    pad: i32,
) -> Option<(i32, i32, i32, i32)> {
    let pad = f64::from(pad);
    let (min_x, min_y) = (-pad, -pad);
    let max_x = f64::from(fb.width()) + pad;
    let max_y = f64::from(fb.height()) + pad;

    let (fx0, fy0) = (f64::from(x0), f64::from(y0));
    let dx = f64::from(x1) - fx0;
    let dy = f64::from(y1) - fy0;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, fx0 - min_x),
        (dx, max_x - fx0),
        (-dy, fy0 - min_y),
        (dy, max_y - fy0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
    }

    Some((
        (fx0 + t0 * dx).round() as i32,
        (fy0 + t0 * dy).round() as i32,
        (fx0 + t1 * dx).round() as i32,
        (fy0 + t1 * dy).round() as i32,
    ))
}

/// Visit every pixel of the Bresenham line from `(x0, y0)` to `(x1, y1)`.
fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut visit: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        visit(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
///
/// # Arguments
///
/// * `fb` - Target framebuffer
/// * `cx`, `cy` - Center coordinates
/// * `radius` - Circle radius in pixels
/// * `color` - Fill color
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.paint_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    // Octant scan lines overlap on the diagonal; collect unique rows first so
    // translucent fills are not blended twice.
    let mut spans: Vec<i32> = vec![-1; (2 * radius + 1) as usize];
    let mut widen = |row: i32, half: i32| {
        let slot = &mut spans[(row + radius) as usize];
        *slot = (*slot).max(half);
    };

    while x >= y {
        widen(y, x);
        widen(-y, x);
        widen(x, y);
        widen(-x, y);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }

    for (i, &half) in spans.iter().enumerate() {
        if half >= 0 {
            let row = cy + i as i32 - radius;
            draw_horizontal_line(fb, cx - half, cx + half, row, color);
        }
    }
}

/// Helper to draw a horizontal line (used by filled circle).
#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

/// Fill a square that may start at negative coordinates.
#[inline]
fn fill_clipped(fb: &mut Framebuffer, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
    let x_end = x + w;
    let y_end = y + h;
    if x_end <= 0 || y_end <= 0 {
        return;
    }
    let x0 = x.max(0);
    let y0 = y.max(0);
    fb.fill_rect(x0 as u32, y0 as u32, (x_end - x0) as u32, (y_end - y0) as u32, color);
}

// ============================================================================
// Tests
// ============================================================================
