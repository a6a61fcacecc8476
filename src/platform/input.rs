//! Keyboard and touch mapping

use glam::Vec2;

use crate::sim::Intent;

/// Shortest swipe that counts, in CSS pixels
pub const MIN_SWIPE_DISTANCE: f32 = 30.0;
/// Slower touches are ignored
pub const MAX_SWIPE_MS: f64 = 500.0;

/// Map a `KeyboardEvent.key` value to an intent
pub fn key_to_intent(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
        "ArrowUp" | "w" | "W" | " " => Some(Intent::Jump),
        "ArrowDown" | "s" | "S" => Some(Intent::Slide),
        "p" | "P" | "Escape" => Some(Intent::Pause),
        _ => None,
    }
}

/// Classify a finished touch; the dominant axis decides (screen y grows down)
pub fn classify_swipe(delta: Vec2, duration_ms: f64) -> Option<Intent> {
    if !(0.0..=MAX_SWIPE_MS).contains(&duration_ms) {
        return None;
    }
    let (ax, ay) = (delta.x.abs(), delta.y.abs());
    if ax < MIN_SWIPE_DISTANCE && ay < MIN_SWIPE_DISTANCE {
        return None;
    }
    if ax > ay {
        Some(if delta.x > 0.0 {
            Intent::MoveRight
        } else {
            Intent::MoveLeft
        })
    } else if delta.y < 0.0 {
        Some(Intent::Jump)
    } else {
        Some(Intent::Slide)
    }
}

/// Remembers where a touch started
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<(Vec2, f64)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, pos: Vec2, time_ms: f64) {
        self.start = Some((pos, time_ms));
    }

    /// Finish the touch; `None` for taps, slow drags, or a missing start
    pub fn end(&mut self, pos: Vec2, time_ms: f64) -> Option<Intent> {
        let (start, t0) = self.start.take()?;
        classify_swipe(pos - start, time_ms - t0)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_to_intent("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(key_to_intent("D"), Some(Intent::MoveRight));
        assert_eq!(key_to_intent(" "), Some(Intent::Jump));
        assert_eq!(key_to_intent("s"), Some(Intent::Slide));
        assert_eq!(key_to_intent("Escape"), Some(Intent::Pause));
        assert_eq!(key_to_intent("q"), None);
    }

    #[test]
    fn test_swipe_directions() {
        assert_eq!(classify_swipe(Vec2::new(80.0, 10.0), 120.0), Some(Intent::MoveRight));
        assert_eq!(classify_swipe(Vec2::new(-80.0, 10.0), 120.0), Some(Intent::MoveLeft));
        assert_eq!(classify_swipe(Vec2::new(5.0, -60.0), 120.0), Some(Intent::Jump));
        assert_eq!(classify_swipe(Vec2::new(5.0, 60.0), 120.0), Some(Intent::Slide));
    }

    #[test]
    fn test_taps_and_slow_drags_ignored() {
        assert_eq!(classify_swipe(Vec2::new(10.0, 12.0), 50.0), None);
        assert_eq!(classify_swipe(Vec2::new(200.0, 0.0), 900.0), None);
    }

    #[test]
    fn test_tracker() {
        let mut t = SwipeTracker::new();
        assert_eq!(t.end(Vec2::new(100.0, 0.0), 10.0), None);
        t.begin(Vec2::new(100.0, 300.0), 1000.0);
        assert_eq!(t.end(Vec2::new(100.0, 200.0), 1200.0), Some(Intent::Jump));
        // Consumed
        assert_eq!(t.end(Vec2::new(100.0, 100.0), 1300.0), None);
    }
}
