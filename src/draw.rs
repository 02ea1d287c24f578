// Window wrapper + HUD text.
// Visual pieces provided here:
// 1) A resizable window showing the composited display surface.
// 2) Edge-triggered key queries for the tool/undo/export/import actions.
// 3) A tiny 5x7 bitmap font for the mode line in the top-left corner.

use crate::error::Error;
use crate::types::{BLACK, Surface};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create the resizable window the painting lives in.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this iteration to the screen.
    /// This is also what pumps the window's input state.
    pub fn present(&mut self, display: &Surface) -> Result<(), Error> {
        self.window
            .update_with_buffer(&display.pixels, display.width, display.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client-area size in pixels; changes when the user resizes.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in display coordinates, unclamped: positions outside
    /// the window (and outside the painting area) pass through untouched,
    /// since recorded stroke points are never clamped.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Pass)
    }

    /// True while the primary button is held; the loop edge-detects this
    /// into pointer-down / pointer-up transitions.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    // One query per discrete action, fired once per physical press.

    /// E toggles draw/erase.
    pub fn erase_toggled(&self) -> bool {
        self.window.is_key_pressed(Key::E, KeyRepeat::No)
    }

    /// B toggles the line/shape brush.
    pub fn brush_toggled(&self) -> bool {
        self.window.is_key_pressed(Key::B, KeyRepeat::No)
    }

    /// U discards the uncommitted stroke.
    pub fn undo_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::U, KeyRepeat::No)
    }

    /// S exports the painting as PNG.
    pub fn export_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    /// I imports the image given on the command line.
    pub fn import_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::I, KeyRepeat::No)
    }
}

/* ---------- 5x7 bitmap font (ASCII subset the HUD needs) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Uppercase letters for "DRAW | ERASE" and "LINE | SHAPE"
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),

        // Punctuation: space, vertical bar
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),

        _ => None,
    }
}

/// Put a pixel on the display surface if (x, y) is inside bounds.
#[inline]
fn put_pixel(display: &mut Surface, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= display.width || y >= display.height {
        return;
    }
    display.pixels[y * display.width + x] = color;
}

/// Draw a single 5x7 character at (x, y).
/// Visual: a tiny glyph with a 1-pixel dark shadow for contrast.
fn draw_char_5x7(display: &mut Surface, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass: offset by (1,1) to improve readability
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(display, x + rx as i32 + 1, y + ry as i32 + 1, BLACK);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(display, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: a compact HUD string; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(display: &mut Surface, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(display, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
