//! Left-button click vs. drag detection

/// Cursor travel, in physical pixels, below which a press-release is a click
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Debug, Default)]
pub struct PointerTracker {
    last_pos: Option<(f64, f64)>,
    pressed: bool,
    /// Where the button went down. Unknown until the first cursor event when
    /// the press came before any movement.
    press_pos: Option<(f64, f64)>,
    dragging: bool,
}

impl PointerTracker {
    pub fn press(&mut self) {
        self.pressed = true;
        self.press_pos = self.last_pos;
        self.dragging = false;
    }

    /// Record a cursor move. Returns the pixel delta while dragging.
    pub fn moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let mut delta = None;

        if self.pressed {
            let press = *self.press_pos.get_or_insert((x, y));
            if !self.dragging && (x - press.0).hypot(y - press.1) > CLICK_SLOP {
                self.dragging = true;
            }
            if self.dragging {
                if let Some(last) = self.last_pos {
                    delta = Some(((x - last.0) as f32, (y - last.1) as f32));
                }
            }
        }

        self.last_pos = Some((x, y));
        delta
    }

    /// Returns true when the press-release pair was a click.
    pub fn release(&mut self) -> bool {
        let was_click = self.pressed && !self.dragging;
        self.pressed = false;
        self.press_pos = None;
        self.dragging = false;
        was_click
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_before_any_cursor_move() {
        let mut pointer = PointerTracker::default();
        pointer.press();
        assert!(pointer.release());
    }

    #[test]
    fn test_small_jitter_is_still_a_click() {
        let mut pointer = PointerTracker::default();
        pointer.moved(100.0, 100.0);
        pointer.press();
        assert_eq!(pointer.moved(102.0, 101.0), None);
        assert!(pointer.release());
    }

    #[test]
    fn test_drag_reports_deltas_and_is_not_a_click() {
        let mut pointer = PointerTracker::default();
        pointer.moved(100.0, 100.0);
        pointer.press();
        assert_eq!(pointer.moved(110.0, 100.0), Some((10.0, 0.0)));
        assert_eq!(pointer.moved(110.0, 95.0), Some((0.0, -5.0)));
        assert!(!pointer.release());
    }

    #[test]
    fn test_drag_after_press_with_unknown_position() {
        let mut pointer = PointerTracker::default();
        pointer.press();
        // First move anchors the press.
        assert_eq!(pointer.moved(50.0, 50.0), None);
        assert!(pointer.moved(60.0, 50.0).is_some());
        assert!(!pointer.release());
    }

    #[test]
    fn test_moves_without_press_never_drag() {
        let mut pointer = PointerTracker::default();
        assert_eq!(pointer.moved(0.0, 0.0), None);
        assert_eq!(pointer.moved(300.0, 300.0), None);
        assert!(!pointer.release());
    }
}
