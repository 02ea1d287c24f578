// Core types shared by every module.
//
// Pixels are packed 0xAARRGGBB. minifb only looks at the low 24 bits, so the
// top byte is ours: we use it as a coverage sentinel. 0x00 in the alpha byte
// means "nothing was ever drawn here", which is what lets the live-stroke
// overlay sit on top of the committed painting without hiding it.

/// Alpha byte marking a pixel as drawn. Everything a brush touches gets this.
pub const OPAQUE: u32 = 0xFF_00_00_00;
/// A pixel no brush has touched. Skipped when blitting one surface over another.
pub const TRANSPARENT: u32 = 0x00_00_00_00;

pub const BLACK: u32 = OPAQUE;
pub const WHITE: u32 = OPAQUE | 0x00_FF_FF_FF;
/// Display background while drawing (light blue).
pub const BG_DRAW: u32 = OPAQUE | 0x00_AD_D8_E6;
/// Display background while erasing (pink).
pub const BG_ERASE: u32 = OPAQUE | 0x00_FF_C0_CB;

/// One recorded stroke sample, in painting-area-local coordinates.
/// `pressure` is `None` for devices that do not report it (a mouse);
/// otherwise a value in [0,1] used only to modulate line width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub pressure: Option<f32>,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, pressure: None }
    }

    pub fn with_pressure(x: f32, y: f32, pressure: f32) -> Self {
        Self { x, y, pressure: Some(pressure) }
    }
}

/// What kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// A pointer event as the host window reports it, in display coordinates.
/// The session maps it into the painting area itself.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub pressure: Option<f32>,
}

impl PointerEvent {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self { kind: PointerKind::Mouse, x, y, pressure: None }
    }

    pub fn pen(x: f32, y: f32, pressure: f32) -> Self {
        Self { kind: PointerKind::Pen, x, y, pressure: Some(pressure) }
    }
}

/// A raster surface: the committed painting, the live stroke overlay, and
/// the on-screen display buffer are all one of these.
#[derive(Clone, PartialEq)]
pub struct Surface {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // length = width * height, packed 0xAARRGGBB
}

impl Surface {
    /// A surface filled with a single color (use `TRANSPARENT` for an overlay).
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    /// Repaint every pixel. Visual: the whole surface becomes `color`.
    pub fn fill(&mut self, color: u32) {
        for px in &mut self.pixels {
            *px = color;
        }
    }

    /// Reset to the untouched state (every pixel transparent).
    pub fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    /// True if no pixel has been drawn since the last clear.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|px| px & OPAQUE == 0)
    }

    /// Copy `src` onto `self` with its top-left corner at (ox, oy).
    /// Transparent source pixels are skipped, so an overlay blits cleanly.
    /// Out-of-range pixels are clipped, which also makes this the
    /// truncate/pad primitive used on resize.
    pub fn blit_over(&mut self, src: &Surface, ox: i32, oy: i32) {
        for sy in 0..src.height {
            let dy = oy + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            let src_row = sy * src.width;
            let dst_row = dy as usize * self.width;
            for sx in 0..src.width {
                let dx = ox + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let px = src.pixels[src_row + sx];
                if px & OPAQUE == 0 {
                    continue;
                }
                self.pixels[dst_row + dx as usize] = px;
            }
        }
    }

    /// Read a pixel, or None when (x, y) is outside the surface.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }
}
