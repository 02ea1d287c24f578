// What you SEE:
// • A light blue window with a white canvas inset 100px from every edge.
// • Hold Left Mouse inside it: you draw a black stroke in real time.
// • E toggles erase mode (background turns pink, strokes paint white).
// • B toggles the brush: thin pressure-width line vs filled shape fan.
// • U discards the last stroke (until the next stroke begins).
// • S saves the painting as painting.png. I re-imports the CLI image.
// • Resizing the window keeps the painting anchored top-left. ESC quits.

mod brush;
mod coords;
mod draw;
mod error;
mod session;
mod types;

use std::env;
use std::fs;

use draw::Drawer;
use error::Error;
use session::Session;
use types::{PointerEvent, Surface, WHITE};

const EXPORT_PATH: &str = "painting.png";

/// Painting-area size for a given display size: the display minus the fixed
/// padding on each side, floored at one pixel so tiny windows stay valid.
fn painting_size(display_w: usize, display_h: usize) -> (usize, usize) {
    let inset = 2 * coords::PADDING as usize;
    (
        display_w.saturating_sub(inset).max(1),
        display_h.saturating_sub(inset).max(1),
    )
}

fn main() -> Result<(), Error> {
    // Optional CLI argument: an image file the I key imports onto the canvas.
    let import_path = env::args().nth(1);

    /* --- Window + session setup ---
       Visual: window opens showing a blank white canvas on a blue border. */
    let mut drawer = Drawer::new("Inkpad", 1280, 800)?;
    let (mut display_w, mut display_h) = drawer.size();
    let mut display = Surface::new(display_w, display_h, types::BG_DRAW);
    let (pw, ph) = painting_size(display_w, display_h);
    let mut session = Session::new(pw, ph);

    // Edge detection for synthesizing pointer-down/up from polled state.
    let mut was_down = false;
    let mut last_pos: Option<(f32, f32)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Viewport resize: the painting keeps its top-left content. */
        let (w, h) = drawer.size();
        if (w, h) != (display_w, display_h) {
            display_w = w;
            display_h = h;
            display = Surface::new(display_w, display_h, types::BG_DRAW);
            let (pw, ph) = painting_size(display_w, display_h);
            session.resize(pw, ph);
        }

        /* 2) Pointer events. minifb only reports the held state, so button
           transitions become pointer-down/up and motion while held becomes
           pointer-move. A mouse reports no pressure. */
        let pos = drawer.mouse_pos();
        let down = drawer.left_mouse_down();
        match (was_down, down, pos) {
            (false, true, Some((x, y))) => session.pointer_down(PointerEvent::mouse(x, y)),
            (true, true, Some((x, y))) => {
                if last_pos != Some((x, y)) {
                    session.pointer_move(PointerEvent::mouse(x, y));
                }
            }
            (true, false, _) => session.pointer_up(),
            _ => {}
        }
        was_down = down;
        last_pos = pos;

        /* 3) Discrete actions. */
        if drawer.erase_toggled() {
            session.toggle_eraser(); // visual: border flips blue <-> pink
        }
        if drawer.brush_toggled() {
            session.toggle_line_brush(); // visual: HUD flips LINE <-> SHAPE
        }
        if drawer.undo_pressed() {
            session.undo(); // visual: the newest stroke vanishes
        }
        if drawer.export_pressed() {
            // Failures are reported and the painting is left untouched.
            match export(&mut session) {
                Ok(Some(path)) => println!("Saved {path}"),
                Ok(None) => {} // mid-stroke, export is a no-op
                Err(e) => eprintln!("{e}"),
            }
        }
        if drawer.import_pressed() {
            if let Some(path) = &import_path {
                // A file that fails to decode is ignored; state is unchanged.
                if let Ok(img) = image::open(path) {
                    session.import(&img); // visual: image lands at the canvas origin
                }
            }
        }

        /* 4) Composite background / committed / live, HUD on top, present. */
        session.composite(&mut display);
        let mode = if session.erasing() { "ERASE" } else { "DRAW" };
        let brush_name = if session.line_brush() { "LINE" } else { "SHAPE" };
        draw::draw_text_5x7(&mut display, 8, 8, &format!("{mode} | {brush_name}"), WHITE);
        drawer.present(&display)?;
    }

    Ok(())
}

/// Encode and write the painting. Returns the path written, or None when a
/// stroke is mid-flight and the export was skipped.
fn export(session: &mut Session) -> Result<Option<&'static str>, Error> {
    let Some(bytes) = session.export_png()? else {
        return Ok(None);
    };
    fs::write(EXPORT_PATH, bytes).map_err(|e| Error::ExportWrite(e.to_string()))?;
    Ok(Some(EXPORT_PATH))
}
