// Display <-> painting-area coordinate mapping.
//
// The painting area sits inset from the window edges by a fixed padding on
// every side, so the canvas shows up with a colored border around it. These
// are the only two places the offset is applied; everything downstream works
// in painting-area-local coordinates.

/// Inset of the painting area from each window edge, in pixels.
pub const PADDING: f32 = 100.0;

/// Map a display-space position into painting-area-local space.
pub fn display_to_painting(x: f32, y: f32) -> (f32, f32) {
    (x - PADDING, y - PADDING)
}

/// Map a painting-area-local position back into display space.
pub fn painting_to_display(x: f32, y: f32) -> (f32, f32) {
    (x + PADDING, y + PADDING)
}

/// Whether a local position falls inside a painting area of the given size.
/// Points outside are still recorded and rasterized (the rasterizers clip
/// per pixel); this exists for callers that want to know.
pub fn in_painting_area(x: f32, y: f32, width: usize, height: usize) -> bool {
    x >= 0.0 && y >= 0.0 && x < width as f32 && y < height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_round_trips() {
        let (lx, ly) = display_to_painting(130.0, 250.0);
        assert_eq!((lx, ly), (30.0, 150.0));
        assert_eq!(painting_to_display(lx, ly), (130.0, 250.0));
    }

    #[test]
    fn area_test_is_half_open() {
        assert!(in_painting_area(0.0, 0.0, 10, 10));
        assert!(in_painting_area(9.9, 9.9, 10, 10));
        assert!(!in_painting_area(10.0, 5.0, 10, 10));
        assert!(!in_painting_area(-0.1, 5.0, 10, 10));
    }
}
