// The drawing session: every piece of mutable drawing state in one owned
// value, driven by pointer events from the host loop.
//
// Two raster surfaces of identical size back the painting area:
//   committed  - white background plus every finished stroke, merged in order
//   live       - only the stroke currently (or most recently) being drawn
// The compositor layers background / committed / live onto the display each
// iteration. Keeping the newest stroke on its own overlay is what makes undo
// (discard the overlay) and commit (blit the overlay down) cheap: history is
// never re-rasterized.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::brush;
use crate::coords::{self, PADDING};
use crate::error::Error;
use crate::types::{
    BG_DRAW, BG_ERASE, BLACK, OPAQUE, Point, PointerEvent, PointerKind, Surface, TRANSPARENT,
    WHITE,
};

/// Stroke input state. Pointer-cancel forces Idle without any bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Drawing,
}

pub struct Session {
    committed: Surface,
    live: Surface,
    /// Points collected since the last pointer-down, painting-area-local.
    points: Vec<Point>,
    state: StrokeState,
    /// Color captured at pointer-down; the whole stroke draws in it.
    stroke_color: u32,
    erasing: bool,
    line_brush: bool,
}

impl Session {
    /// A fresh session over a painting area of the given pixel size.
    /// Visual: a blank white canvas, line brush, draw mode.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            committed: Surface::new(width, height, WHITE),
            live: Surface::new(width, height, TRANSPARENT),
            points: Vec::new(),
            state: StrokeState::Idle,
            stroke_color: BLACK,
            erasing: false,
            line_brush: true,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn erasing(&self) -> bool {
        self.erasing
    }

    pub fn line_brush(&self) -> bool {
        self.line_brush
    }

    pub fn committed(&self) -> &Surface {
        &self.committed
    }

    pub fn live(&self) -> &Surface {
        &self.live
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Painting-area size in pixels.
    pub fn size(&self) -> (usize, usize) {
        (self.committed.width, self.committed.height)
    }

    /// Map a host pointer event into a local stroke point. Pressure is
    /// honored only for pens; mice and touch report nothing meaningful.
    fn map_event(&self, ev: PointerEvent) -> Point {
        let (x, y) = coords::display_to_painting(ev.x, ev.y);
        let pressure = if ev.kind == PointerKind::Pen { ev.pressure } else { None };
        Point { x, y, pressure }
    }

    /// Merge the live overlay into the committed painting and reset it.
    /// No-op when the overlay is blank (first stroke, or right after undo).
    fn commit_live(&mut self) {
        if self.live.is_blank() {
            return;
        }
        self.committed.blit_over(&self.live, 0, 0);
        self.live.clear();
    }

    /// Idle -> Drawing. The previous stroke (if any is still live) is merged
    /// first, then a new stroke begins at the event position.
    pub fn pointer_down(&mut self, ev: PointerEvent) {
        self.commit_live();
        self.points.clear();
        self.points.push(self.map_event(ev));
        self.stroke_color = if self.erasing { WHITE } else { BLACK };
        self.state = StrokeState::Drawing;
    }

    /// Drawing -> Drawing. Appends the point and rasterizes only the newest
    /// increment onto the live overlay; the rest of the stroke is already
    /// there. Ignored while Idle.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if self.state != StrokeState::Drawing {
            return;
        }
        self.points.push(self.map_event(ev));
        let cmds = brush::plan_increment(&self.points, self.line_brush);
        brush::apply(&mut self.live, &cmds, self.stroke_color);
    }

    /// Drawing -> Idle. The stroke stays on the live overlay, still undoable
    /// until the next pointer-down or an export merges it.
    pub fn pointer_up(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Drawing -> Idle with no other bookkeeping.
    pub fn pointer_cancel(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Discard the uncommitted stroke. Single level: anything already merged
    /// into the committed painting stays. No-op when nothing is live.
    pub fn undo(&mut self) {
        self.live.clear();
        self.points.clear();
    }

    pub fn toggle_eraser(&mut self) {
        self.erasing = !self.erasing;
    }

    pub fn toggle_line_brush(&mut self) {
        self.line_brush = !self.line_brush;
    }

    /// Resize the painting area, keeping committed content anchored at the
    /// top-left: truncated on shrink, padded with white on grow, never
    /// rescaled. An in-progress stroke is aborted outright so the live
    /// overlay and the point sequence stay in agreement.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == self.size() {
            return;
        }
        let old = std::mem::replace(&mut self.committed, Surface::new(width, height, WHITE));
        self.committed.blit_over(&old, 0, 0);
        self.live = Surface::new(width, height, TRANSPARENT);
        self.points.clear();
        self.state = StrokeState::Idle;
    }

    /// Draw the whole frame: mode background, then the committed painting,
    /// then the live overlay, both at the padded inset. Full redraw every
    /// time; the area is small and redraws are input-rate-bounded.
    pub fn composite(&self, display: &mut Surface) {
        display.fill(if self.erasing { BG_ERASE } else { BG_DRAW });
        let inset = PADDING as i32;
        display.blit_over(&self.committed, inset, inset);
        display.blit_over(&self.live, inset, inset);
    }

    /// Draw a decoded image onto the committed painting at the origin, no
    /// scaling, clipped to the painting area. Replaces whatever was under it.
    pub fn import(&mut self, img: &DynamicImage) {
        let rgb = img.to_rgb8();
        let w = self.committed.width as u32;
        let h = self.committed.height as u32;
        for (x, y, px) in rgb.enumerate_pixels() {
            if x >= w || y >= h {
                continue;
            }
            let packed = ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | (px[2] as u32);
            self.committed.pixels[y as usize * self.committed.width + x as usize] =
                packed | OPAQUE;
        }
    }

    /// Encode the committed painting as PNG bytes. A pending live stroke is
    /// merged in first (after which undo can no longer contradict the
    /// exported image). Returns None while a stroke is actively being drawn;
    /// exporting twice without drawing in between yields identical bytes.
    pub fn export_png(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.state == StrokeState::Drawing {
            return Ok(None);
        }
        self.commit_live();
        self.points.clear();

        let w = self.committed.width as u32;
        let h = self.committed.height as u32;
        let mut img = RgbImage::new(w, h);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let packed = self.committed.pixels[y as usize * self.committed.width + x as usize];
            px[0] = ((packed >> 16) & 0xFF) as u8;
            px[1] = ((packed >> 8) & 0xFF) as u8;
            px[2] = (packed & 0xFF) as u8;
        }

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::ExportEncode(e.to_string()))?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Painting-area-local coordinates shifted into display space, the way
    // the host window would report them.
    fn mouse_at(lx: f32, ly: f32) -> PointerEvent {
        let (x, y) = coords::painting_to_display(lx, ly);
        PointerEvent::mouse(x, y)
    }

    fn pen_at(lx: f32, ly: f32, pressure: f32) -> PointerEvent {
        let (x, y) = coords::painting_to_display(lx, ly);
        PointerEvent::pen(x, y, pressure)
    }

    fn stroke(session: &mut Session, path: &[(f32, f32)]) {
        session.pointer_down(mouse_at(path[0].0, path[0].1));
        for &(x, y) in &path[1..] {
            session.pointer_move(mouse_at(x, y));
        }
        session.pointer_up();
    }

    #[test]
    fn live_surface_equals_replay_of_the_points() {
        for line_brush in [true, false] {
            let mut session = Session::new(40, 40);
            if session.line_brush() != line_brush {
                session.toggle_line_brush();
            }
            let path = [(5.0, 5.0), (15.0, 8.0), (20.0, 20.0), (8.0, 25.0)];
            stroke(&mut session, &path);

            // Replay the same points through the pure planner.
            let mut expected = Surface::new(40, 40, TRANSPARENT);
            let points: Vec<Point> =
                path.iter().map(|&(x, y)| Point::new(x, y)).collect();
            for i in 2..=points.len() {
                let cmds = brush::plan_increment(&points[..i], line_brush);
                brush::apply(&mut expected, &cmds, BLACK);
            }

            assert_eq!(session.points().len(), path.len());
            assert!(*session.live() == expected);
        }
    }

    #[test]
    fn undo_restores_committed_exactly() {
        let mut session = Session::new(32, 32);
        stroke(&mut session, &[(2.0, 2.0), (30.0, 2.0)]);
        session.pointer_down(mouse_at(2.0, 10.0)); // merges the first stroke
        session.pointer_up();
        let before = session.committed().clone();

        stroke(&mut session, &[(5.0, 20.0), (25.0, 20.0)]);
        assert!(!session.live().is_blank());
        assert!(*session.committed() == before);

        session.undo();
        assert!(session.live().is_blank());
        assert!(session.points().is_empty());
        assert!(*session.committed() == before);
    }

    #[test]
    fn undo_with_nothing_live_is_a_noop() {
        let mut session = Session::new(16, 16);
        let committed = session.committed().clone();
        session.undo();
        assert!(*session.committed() == committed);
        assert!(session.live().is_blank());
    }

    #[test]
    fn second_pointer_down_commits_the_prior_stroke() {
        let mut session = Session::new(32, 32);
        stroke(&mut session, &[(4.0, 4.0), (28.0, 4.0)]);
        assert_eq!(session.committed().get(16, 4), Some(WHITE));

        session.pointer_down(mouse_at(4.0, 20.0));
        assert_eq!(session.committed().get(16, 4), Some(BLACK));
        assert!(session.live().is_blank());
        assert_eq!(session.points().len(), 1);
        assert_eq!(session.state(), StrokeState::Drawing);
    }

    #[test]
    fn cancel_returns_to_idle_and_keeps_the_overlay() {
        let mut session = Session::new(32, 32);
        session.pointer_down(mouse_at(4.0, 4.0));
        session.pointer_move(mouse_at(28.0, 4.0));
        session.pointer_cancel();
        assert_eq!(session.state(), StrokeState::Idle);
        assert!(!session.live().is_blank());
    }

    #[test]
    fn eraser_paints_the_background_color() {
        let mut session = Session::new(32, 32);
        stroke(&mut session, &[(4.0, 10.0), (28.0, 10.0)]);
        session.pointer_down(mouse_at(0.0, 0.0));
        session.pointer_up();
        assert_eq!(session.committed().get(16, 10), Some(BLACK));

        session.toggle_eraser();
        assert!(session.erasing());
        stroke(&mut session, &[(4.0, 10.0), (28.0, 10.0)]);
        session.pointer_down(mouse_at(0.0, 0.0));
        session.pointer_up();
        assert_eq!(session.committed().get(16, 10), Some(WHITE));
    }

    #[test]
    fn pen_pressure_is_recorded_and_mouse_pressure_ignored() {
        let mut session = Session::new(32, 32);
        session.pointer_down(pen_at(2.0, 2.0, 0.5));
        session.pointer_move(pen_at(8.0, 2.0, 0.9));
        assert_eq!(session.points()[1].pressure, Some(0.9));

        let mut bogus = mouse_at(12.0, 2.0);
        bogus.pressure = Some(0.3); // a mouse claiming pressure
        session.pointer_move(bogus);
        assert_eq!(session.points()[2].pressure, None);

        let mut touch = mouse_at(16.0, 2.0);
        touch.kind = PointerKind::Touch;
        touch.pressure = Some(0.6); // touch force is ignored too
        session.pointer_move(touch);
        assert_eq!(session.points()[3].pressure, None);
    }

    #[test]
    fn out_of_area_points_are_still_recorded() {
        let mut session = Session::new(16, 16);
        session.pointer_down(mouse_at(8.0, 8.0));
        session.pointer_move(mouse_at(-30.0, 50.0));
        assert_eq!(session.points().len(), 2);
        assert_eq!(session.points()[1], Point::new(-30.0, 50.0));
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut session = Session::new(16, 16);
        session.pointer_move(mouse_at(5.0, 5.0));
        assert!(session.points().is_empty());
        assert!(session.live().is_blank());
    }

    #[test]
    fn resize_preserves_overlap_and_pads_with_white() {
        let mut session = Session::new(20, 20);
        stroke(&mut session, &[(2.0, 5.0), (18.0, 5.0)]);
        session.pointer_down(mouse_at(0.0, 0.0));
        session.pointer_up();
        assert_eq!(session.committed().get(10, 5), Some(BLACK));

        session.resize(30, 12);
        assert_eq!(session.size(), (30, 12));
        // Overlapping content survives.
        assert_eq!(session.committed().get(10, 5), Some(BLACK));
        // Newly exposed area is background white.
        assert_eq!(session.committed().get(25, 5), Some(WHITE));
    }

    #[test]
    fn resize_during_a_stroke_aborts_it() {
        let mut session = Session::new(20, 20);
        session.pointer_down(mouse_at(2.0, 2.0));
        session.pointer_move(mouse_at(18.0, 2.0));
        session.resize(24, 24);
        assert_eq!(session.state(), StrokeState::Idle);
        assert!(session.points().is_empty());
        assert!(session.live().is_blank());
    }

    #[test]
    fn export_merges_the_pending_stroke_and_is_stable() {
        let mut session = Session::new(24, 24);
        stroke(&mut session, &[(2.0, 12.0), (22.0, 12.0)]);
        assert_eq!(session.committed().get(12, 12), Some(WHITE));

        let first = session.export_png().unwrap().expect("idle export succeeds");
        // The pending stroke was merged before encoding.
        assert_eq!(session.committed().get(12, 12), Some(BLACK));
        assert!(session.live().is_blank());

        let decoded = image::load_from_memory(&first).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (24, 24));
        assert_eq!(decoded.get_pixel(12, 12).0, [0, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 255, 255]);

        let second = session.export_png().unwrap().expect("idle export succeeds");
        assert_eq!(first, second);
    }

    #[test]
    fn export_is_a_noop_while_drawing() {
        let mut session = Session::new(16, 16);
        session.pointer_down(mouse_at(2.0, 2.0));
        session.pointer_move(mouse_at(10.0, 2.0));
        assert!(session.export_png().unwrap().is_none());
        // Still drawing, nothing merged.
        assert_eq!(session.state(), StrokeState::Drawing);
        assert!(!session.live().is_blank());
    }

    #[test]
    fn composite_layers_background_committed_live() {
        let mut session = Session::new(20, 20);
        session.pointer_down(mouse_at(2.0, 10.0));
        session.pointer_move(mouse_at(18.0, 10.0));
        session.pointer_up();

        let pad = PADDING as usize;
        let mut display = Surface::new(pad * 2 + 20, pad * 2 + 20, TRANSPARENT);
        session.composite(&mut display);
        // Border shows the mode background.
        assert_eq!(display.get(0, 0), Some(BG_DRAW));
        // White canvas shows through where nothing was drawn.
        assert_eq!(display.get(pad + 1, pad + 1), Some(WHITE));
        // The live stroke rides on top at the padded offset.
        assert_eq!(display.get(pad + 10, pad + 10), Some(BLACK));

        session.toggle_eraser();
        session.composite(&mut display);
        assert_eq!(display.get(0, 0), Some(BG_ERASE));
    }

    #[test]
    fn import_lands_at_the_origin_and_clips() {
        let mut session = Session::new(10, 10);
        // 4x4 red block, larger than nothing but smaller than the canvas.
        let mut img = RgbImage::new(4, 4);
        for px in img.pixels_mut() {
            px.0 = [255, 0, 0];
        }
        session.import(&DynamicImage::ImageRgb8(img));
        let red = OPAQUE | 0x00_FF_00_00;
        assert_eq!(session.committed().get(0, 0), Some(red));
        assert_eq!(session.committed().get(3, 3), Some(red));
        assert_eq!(session.committed().get(5, 5), Some(WHITE));

        // Oversized imports clip instead of resizing the canvas.
        let mut big = RgbImage::new(40, 40);
        for px in big.pixels_mut() {
            px.0 = [0, 255, 0];
        }
        session.import(&DynamicImage::ImageRgb8(big));
        assert_eq!(session.size(), (10, 10));
        let green = OPAQUE | 0x00_00_FF_00;
        assert_eq!(session.committed().get(9, 9), Some(green));
    }
}
