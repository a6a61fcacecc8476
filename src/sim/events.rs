//! Events raised by the simulation
//!
//! The tick never talks to audio, UI, or storage directly. It pushes events and
//! cues; the session drains them once per frame. Side effects that must happen
//! later (the game-over screen) go through [`DelayedQueue`] instead of timers.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Sound triggers for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Coin,
    Jump,
    Slide,
    Crash,
    Swipe,
    PowerUp,
}

/// Gameplay events for UI and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { value: u32 },
    PowerUpCollected(PowerUpKind),
    /// Player hit an obstacle this tick
    Crashed { score: u64, coins: u32 },
    /// Delayed: time to show the game-over screen
    ShowGameOver {
        score: u64,
        coins: u32,
        best: u64,
        new_best: bool,
    },
}

/// Events waiting for their delay to elapse
#[derive(Debug, Clone, Default)]
pub struct DelayedQueue {
    pending: Vec<(f32, GameEvent)>,
}

impl DelayedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: f32, event: GameEvent) {
        self.pending.push((delay.max(0.0), event));
    }

    /// Advance time and return every event that came due, in scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.max(0.0);
        let mut due = Vec::new();
        let mut remaining = Vec::with_capacity(self.pending.len());
        for (delay, event) in self.pending.drain(..) {
            let delay = delay - dt;
            if delay <= 0.0 {
                due.push(event);
            } else {
                remaining.push((delay, event));
            }
        }
        self.pending = remaining;
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delayed_event_fires_once() {
        let mut q = DelayedQueue::new();
        q.schedule(0.8, GameEvent::CoinCollected { value: 1 });
        assert!(q.advance(0.5).is_empty());
        let due = q.advance(0.4);
        assert_eq!(due, vec![GameEvent::CoinCollected { value: 1 }]);
        assert!(q.advance(1.0).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let mut q = DelayedQueue::new();
        q.schedule(0.1, GameEvent::CoinCollected { value: 1 });
        q.schedule(0.0, GameEvent::CoinCollected { value: 2 });
        let due = q.advance(0.2);
        assert_eq!(
            due,
            vec![
                GameEvent::CoinCollected { value: 1 },
                GameEvent::CoinCollected { value: 2 }
            ]
        );
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut q = DelayedQueue::new();
        q.schedule(0.1, GameEvent::CoinCollected { value: 1 });
        assert!(q.advance(-5.0).is_empty());
        assert_eq!(q.advance(0.1).len(), 1);
    }
}
