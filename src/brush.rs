// Brush geometry and software rasterization.
//
// Planning is pure: given the stroke's point sequence, `plan_increment`
// returns the draw commands for the *newest* point only. The whole stroke is
// never re-rasterized on a move; each increment lands on top of what is
// already on the live surface. Applying commands to a `Surface` is the only
// part that touches pixels, so the geometry is testable without a window.

use crate::types::{OPAQUE, Point, Surface};

/// Fixed outline width used by the fan brush to close the hairline gaps
/// between consecutive triangle fills.
pub const FAN_OUTLINE_WIDTH: f32 = 2.0;
/// Line width when neither the newest nor the previous point has pressure.
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
/// Full pressure (1.0) maps to this line width.
pub const PRESSURE_WIDTH_SCALE: f32 = 10.0;

/// One resolution-independent draw primitive. Positions are
/// painting-area-local; the rasterizers clip per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// A round-capped straight segment of the given width.
    Segment { from: (f32, f32), to: (f32, f32), width: f32 },
    /// A filled triangle, outlined at `outline_width` to seal fill seams.
    Triangle { a: (f32, f32), b: (f32, f32), c: (f32, f32), outline_width: f32 },
}

/// Plan the commands for the most recently appended point.
///
/// Line brush: one segment from the previous point to the newest, width
/// taken from the newest point's pressure (times the scale), falling back to
/// the previous point's pressure, then to the fixed default.
///
/// Fan brush: one filled triangle from the stroke anchor `P[0]` through the
/// previous point to the newest. Repeated over a whole stroke this fans out
/// into a solid blob shape.
///
/// Either brush needs at least two points; with fewer there is nothing to draw.
pub fn plan_increment(points: &[Point], line_brush: bool) -> Vec<DrawCmd> {
    if points.len() < 2 {
        return Vec::new();
    }
    let prev = points[points.len() - 2];
    let last = points[points.len() - 1];

    if line_brush {
        let width = last
            .pressure
            .or(prev.pressure)
            .map(|p| p * PRESSURE_WIDTH_SCALE)
            .unwrap_or(DEFAULT_LINE_WIDTH);
        vec![DrawCmd::Segment {
            from: (prev.x, prev.y),
            to: (last.x, last.y),
            width,
        }]
    } else {
        let anchor = points[0];
        vec![DrawCmd::Triangle {
            a: (anchor.x, anchor.y),
            b: (prev.x, prev.y),
            c: (last.x, last.y),
            outline_width: FAN_OUTLINE_WIDTH,
        }]
    }
}

/// Rasterize a batch of commands onto a surface in one solid color.
pub fn apply(surface: &mut Surface, cmds: &[DrawCmd], color: u32) {
    for cmd in cmds {
        match *cmd {
            DrawCmd::Segment { from, to, width } => {
                fill_round_segment(surface, from, to, width, color);
            }
            DrawCmd::Triangle { a, b, c, outline_width } => {
                fill_triangle(surface, a, b, c, color);
                // Stroke the three edges so adjacent fan triangles overlap
                // instead of leaving unpainted seams between them.
                fill_round_segment(surface, a, b, outline_width, color);
                fill_round_segment(surface, b, c, outline_width, color);
                fill_round_segment(surface, c, a, outline_width, color);
            }
        }
    }
}

/// Put a pixel on the surface if (x, y) is inside bounds.
#[inline]
fn put_pixel(surface: &mut Surface, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= surface.width || y >= surface.height {
        return;
    }
    surface.pixels[y * surface.width + x] = color | OPAQUE;
}

/// Clip a float bounding-box range to the surface and return integer pixel
/// bounds, or None when the range misses the surface entirely.
fn clipped_range(lo: f32, hi: f32, limit: usize) -> Option<(i32, i32)> {
    let lo = lo.floor() as i32;
    let hi = hi.ceil() as i32;
    if hi < 0 || lo >= limit as i32 {
        return None;
    }
    Some((lo.max(0), hi.min(limit as i32 - 1)))
}

/// A thick segment with round caps, rasterized as all pixels whose centers
/// lie within width/2 of the segment. The distance test gives the round
/// joins and caps directly, so consecutive segments meet cleanly.
fn fill_round_segment(
    surface: &mut Surface,
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    width: f32,
    color: u32,
) {
    // A zero or sub-pixel width still has to leave a mark.
    let r = (width / 2.0).max(0.5);

    let (min_x, max_x) = (x0.min(x1) - r, x0.max(x1) + r);
    let (min_y, max_y) = (y0.min(y1) - r, y0.max(y1) + r);
    let Some((px0, px1)) = clipped_range(min_x, max_x, surface.width) else {
        return;
    };
    let Some((py0, py1)) = clipped_range(min_y, max_y, surface.height) else {
        return;
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let len2 = dx * dx + dy * dy;
    let r2 = r * r;

    for py in py0..=py1 {
        for px in px0..=px1 {
            let cx = px as f32 + 0.5;
            let cy = py as f32 + 0.5;
            // Project the pixel center onto the segment, clamped to [0,1].
            let t = if len2 > 0.0 {
                (((cx - x0) * dx + (cy - y0) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let ex = cx - (x0 + t * dx);
            let ey = cy - (y0 + t * dy);
            if ex * ex + ey * ey <= r2 {
                put_pixel(surface, px, py, color);
            }
        }
    }
}

/// Fill a triangle by testing pixel centers against the three edge
/// functions. Either winding is accepted: inside means all three cross
/// products share a sign (or are zero).
fn fill_triangle(
    surface: &mut Surface,
    (ax, ay): (f32, f32),
    (bx, by): (f32, f32),
    (cx, cy): (f32, f32),
    color: u32,
) {
    let min_x = ax.min(bx).min(cx);
    let max_x = ax.max(bx).max(cx);
    let min_y = ay.min(by).min(cy);
    let max_y = ay.max(by).max(cy);
    let Some((px0, px1)) = clipped_range(min_x, max_x, surface.width) else {
        return;
    };
    let Some((py0, py1)) = clipped_range(min_y, max_y, surface.height) else {
        return;
    };

    let edge = |x0: f32, y0: f32, x1: f32, y1: f32, px: f32, py: f32| {
        (px - x0) * (y1 - y0) - (py - y0) * (x1 - x0)
    };

    for py in py0..=py1 {
        for px in px0..=px1 {
            let sx = px as f32 + 0.5;
            let sy = py as f32 + 0.5;
            let e0 = edge(ax, ay, bx, by, sx, sy);
            let e1 = edge(bx, by, cx, cy, sx, sy);
            let e2 = edge(cx, cy, ax, ay, sx, sy);
            let all_neg = e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0;
            let all_pos = e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0;
            if all_neg || all_pos {
                put_pixel(surface, px, py, color);
            }
        }
    }
}
