//! Drag gesture state and edge autoscroll.
//!
//! At most one gesture is active at a time; the view owns it as an
//! `Option<DragGesture>`. [`Autoscroll`] is a single-axis helper driven by a
//! host timer, so the scroll position keeps moving while the pointer rests
//! beyond a viewport edge.

/// An in-progress rewire drag, anchored at one input slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    /// Row index of the slot being rewired.
    pub row: usize,
    /// Slot index within the row.
    pub slot: usize,
    /// Where the gesture started, at the slot's connection anchor.
    pub origin: (f32, f32),
    /// Latest pointer position.
    pub position: (f32, f32),
}

impl DragGesture {
    pub fn new(row: usize, slot: usize, origin: (f32, f32)) -> Self {
        Self {
            row,
            slot,
            origin,
            position: origin,
        }
    }

    /// Record a pointer move.
    pub fn move_to(&mut self, position: (f32, f32)) {
        self.position = position;
    }
}

/// Scroll velocity for one axis while a drag hovers near a viewport edge.
///
/// The host calls [`update`](Autoscroll::update) on every pointer move and
/// [`tick`](Autoscroll::tick) from a repeating timer (the stock cadence is
/// 150ms) for as long as [`is_active`](Autoscroll::is_active) holds.
#[derive(Clone, Copy, Debug)]
pub struct Autoscroll {
    /// Base scroll step per tick (default: 10).
    pub speed: f32,
    /// Width of the edge band that triggers scrolling (default: 15).
    pub margin: f32,
    velocity: f32,
}

impl Default for Autoscroll {
    fn default() -> Self {
        Self {
            speed: 10.0,
            margin: 15.0,
            velocity: 0.0,
        }
    }
}

impl Autoscroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the velocity from a pointer position, in viewport
    /// coordinates along this axis. Inside the margin band the speed is
    /// constant; past the viewport edge it grows with the overshoot.
    pub fn update(&mut self, pointer: f32, viewport_size: f32) {
        self.velocity = if pointer < 0.0 {
            -(self.speed - pointer / 5.0)
        } else if pointer < self.margin {
            -self.speed
        } else if pointer > viewport_size {
            self.speed + (pointer - viewport_size) / 5.0
        } else if pointer > viewport_size - self.margin {
            self.speed
        } else {
            0.0
        };
    }

    /// Stop scrolling, typically on drag end.
    pub fn stop(&mut self) {
        self.velocity = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.velocity != 0.0
    }

    /// Apply one timer tick to a scroll value, clamped to the scrollable
    /// range `[0, upper - page]`.
    pub fn tick(&self, value: f32, upper: f32, page: f32) -> f32 {
        (value + self.velocity).clamp(0.0, (upper - page).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Gesture state
    // ========================================================================

    #[test]
    fn test_gesture_starts_at_origin() {
        let drag = DragGesture::new(2, 1, (48.0, 60.0));
        assert_eq!(drag.position, drag.origin);
        assert_eq!(drag.row, 2);
        assert_eq!(drag.slot, 1);
    }

    #[test]
    fn test_move_updates_position_only() {
        let mut drag = DragGesture::new(0, 0, (24.0, 12.0));
        drag.move_to((300.0, 40.0));
        assert_eq!(drag.position, (300.0, 40.0));
        assert_eq!(drag.origin, (24.0, 12.0));
    }

    // ========================================================================
    // Autoscroll velocity
    // ========================================================================

    #[test]
    fn test_idle_in_the_middle() {
        let mut scroll = Autoscroll::new();
        scroll.update(100.0, 200.0);
        assert!(!scroll.is_active());
        assert_eq!(scroll.tick(50.0, 400.0, 200.0), 50.0);
    }

    #[test]
    fn test_scrolls_up_near_top_edge() {
        let mut scroll = Autoscroll::new();
        scroll.update(5.0, 200.0);
        assert!(scroll.is_active());
        assert_eq!(scroll.tick(50.0, 400.0, 200.0), 40.0);
    }

    #[test]
    fn test_scrolls_down_near_bottom_edge() {
        let mut scroll = Autoscroll::new();
        scroll.update(195.0, 200.0);
        assert_eq!(scroll.tick(50.0, 400.0, 200.0), 60.0);
    }

    #[test]
    fn test_speed_is_constant_inside_the_margin_band() {
        let mut top = Autoscroll::new();
        let mut bottom = Autoscroll::new();
        top.update(14.0, 200.0);
        bottom.update(1.0, 200.0);
        let from = 100.0;
        // Anywhere in the band scrolls at the base speed.
        assert_eq!(top.tick(from, 400.0, 200.0), from - 10.0);
        assert_eq!(bottom.tick(from, 400.0, 200.0), from - 10.0);
    }

    #[test]
    fn test_speed_grows_past_the_viewport_edge() {
        let mut scroll = Autoscroll::new();
        // 20px above the top: 10 base + 20 / 5 = 14, upward.
        scroll.update(-20.0, 200.0);
        assert_eq!(scroll.tick(100.0, 400.0, 200.0), 86.0);
        // 30px below the bottom: 10 base + 30 / 5 = 16, downward.
        scroll.update(230.0, 200.0);
        assert_eq!(scroll.tick(100.0, 400.0, 200.0), 116.0);
    }

    // ========================================================================
    // Clamping
    // ========================================================================

    #[test]
    fn test_tick_clamps_at_both_ends() {
        let mut scroll = Autoscroll::new();
        scroll.update(0.0, 200.0);
        assert_eq!(scroll.tick(2.0, 400.0, 200.0), 0.0);
        scroll.update(200.0, 200.0);
        assert_eq!(scroll.tick(199.0, 400.0, 200.0), 200.0);
    }

    #[test]
    fn test_content_smaller_than_page_pins_to_zero() {
        let mut scroll = Autoscroll::new();
        scroll.update(200.0, 200.0);
        assert_eq!(scroll.tick(0.0, 100.0, 200.0), 0.0);
    }

    #[test]
    fn test_stop_clears_velocity() {
        let mut scroll = Autoscroll::new();
        scroll.update(0.0, 200.0);
        assert!(scroll.is_active());
        scroll.stop();
        assert!(!scroll.is_active());
    }
}
