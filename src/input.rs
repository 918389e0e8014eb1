use glam::{IVec2, Vec2};

/// Edge-detects left-button presses and holds them until a tick consumes them.
///
/// Several button events can arrive between two ticks, and several ticks can
/// run in one frame; the latch makes sure one physical press toggles exactly
/// once.
pub struct PressLatch {
    was_down: bool,
    pending: bool,
}

impl PressLatch {
    pub fn new() -> Self {
        Self {
            was_down: false,
            pending: false,
        }
    }

    /// Feed a raw button state.
    pub fn update(&mut self, down: bool) {
        if down && !self.was_down {
            self.pending = true;
        }
        self.was_down = down;
    }

    /// Consume the pending press, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Best-known cursor position in logical screen coordinates.
///
/// On Windows the position is polled globally every frame via `set_screen`.
/// Elsewhere winit only reports positions over our own window, so those are
/// anchored to the window origin and raw device motion fills in while the
/// cursor is outside.
pub struct CursorTracker {
    pos: Vec2,
    inside: bool,
}

impl CursorTracker {
    pub fn new(initial: Vec2) -> Self {
        Self {
            pos: initial,
            inside: false,
        }
    }

    /// Absolute position from a global query.
    pub fn set_screen(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Cursor moved over the window. `local` is relative to `window_origin`.
    pub fn on_cursor_moved(&mut self, window_origin: IVec2, local: Vec2) {
        self.pos = window_origin.as_vec2() + local;
        self.inside = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.inside = false;
    }

    /// Relative device motion. Ignored while window events are authoritative.
    pub fn on_motion(&mut self, delta: Vec2, bounds: IVec2) {
        if self.inside {
            return;
        }
        self.pos = (self.pos + delta).clamp(Vec2::ZERO, bounds.max(IVec2::ZERO).as_vec2());
    }

    pub fn position(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_reports_one_edge_per_press() {
        let mut latch = PressLatch::new();
        assert!(!latch.take());

        latch.update(true);
        latch.update(true);
        assert!(latch.take());
        assert!(!latch.take());

        latch.update(false);
        assert!(!latch.take());
    }

    #[test]
    fn latch_holds_press_released_before_tick() {
        let mut latch = PressLatch::new();
        latch.update(true);
        latch.update(false);
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn cursor_moved_is_anchored_to_window() {
        let mut cursor = CursorTracker::new(Vec2::ZERO);
        cursor.on_cursor_moved(IVec2::new(100, 200), Vec2::new(5.4, 7.6));
        assert_eq!(cursor.position(), IVec2::new(105, 208));
    }

    #[test]
    fn motion_only_applies_outside_window() {
        let bounds = IVec2::new(800, 600);
        let mut cursor = CursorTracker::new(Vec2::new(400.0, 300.0));

        cursor.on_motion(Vec2::new(10.0, -20.0), bounds);
        assert_eq!(cursor.position(), IVec2::new(410, 280));

        cursor.on_cursor_moved(IVec2::new(0, 0), Vec2::new(50.0, 50.0));
        cursor.on_motion(Vec2::new(10.0, 10.0), bounds);
        assert_eq!(cursor.position(), IVec2::new(50, 50));

        cursor.on_cursor_left();
        cursor.on_motion(Vec2::new(-1000.0, 10.0), bounds);
        assert_eq!(cursor.position(), IVec2::new(0, 60));
    }
}
