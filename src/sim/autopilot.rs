//! Demo-mode autopilot
//!
//! Looks a short way down the track and picks one intent per frame: hop a low
//! barrier, duck a high one, or change lanes around a train. Used for the
//! attract screen and the headless native run.

use super::state::{BarrierKind, GameState};
use super::tick::Intent;
use crate::consts::*;

/// Seconds of travel the autopilot looks ahead
const REACTION_TIME: f32 = 0.45;
/// Minimum look-ahead in world units
const MIN_LOOKAHEAD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Threat {
    Train,
    Barrier(BarrierKind),
}

fn lookahead(state: &GameState) -> f32 {
    (state.speed * REACTION_TIME).max(MIN_LOOKAHEAD)
}

/// Nearest obstacle in `lane` between the player and `horizon`
fn nearest_threat(state: &GameState, lane: usize, horizon: f32) -> Option<(f32, Threat)> {
    let window = (PLAYER_Z, horizon);
    let trains = state
        .world
        .trains
        .iter()
        .filter(|t| t.lane == lane && t.z <= window.1 && t.z + t.length >= window.0)
        .map(|t| (t.z, Threat::Train));
    let barriers = state
        .world
        .barriers
        .iter()
        .filter(|b| b.lane == lane && b.z <= window.1 && b.z + BARRIER_DEPTH >= window.0)
        .map(|b| (b.z, Threat::Barrier(b.kind)));
    trains
        .chain(barriers)
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

/// Pick the intent for this frame, if any
pub fn choose_intent(state: &GameState) -> Option<Intent> {
    let player = &state.player;
    if player.dead || player.has_jetpack {
        return None;
    }
    // Wait for the current lane change to settle
    if (player.x - crate::lane_x(player.target_lane)).abs() > LANE_SETTLE_EPSILON {
        return None;
    }

    let horizon = lookahead(state);
    let lane = player.target_lane;
    let (_, threat) = nearest_threat(state, lane, horizon)?;

    match threat {
        Threat::Barrier(BarrierKind::Low) if !player.jumping => Some(Intent::Jump),
        Threat::Barrier(BarrierKind::High) if !player.sliding => Some(Intent::Slide),
        Threat::Barrier(_) => None,
        Threat::Train => {
            // Prefer the centre, then whichever side is clear the longest
            let mut options: Vec<(usize, Intent)> = Vec::with_capacity(2);
            if lane > 0 {
                options.push((lane - 1, Intent::MoveLeft));
            }
            if lane + 1 < LANE_COUNT {
                options.push((lane + 1, Intent::MoveRight));
            }
            options
                .into_iter()
                .map(|(l, intent)| {
                    let clear_until = nearest_threat(state, l, horizon * 2.0)
                        .map(|(z, _)| z)
                        .unwrap_or(f32::MAX);
                    (clear_until, l == 1, intent)
                })
                .filter(|(clear_until, _, _)| *clear_until > PLAYER_Z + PLAYER_DEPTH)
                .max_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(_, _, intent)| intent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Barrier, GamePhase, TRAIN_COLORS, Train};
    use crate::sim::tick::{apply_intent, tick};
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_idle_on_clear_track() {
        let state = playing();
        assert_eq!(choose_intent(&state), None);
    }

    #[test]
    fn test_jumps_low_barrier() {
        let mut state = playing();
        state.world.barriers.push(Barrier::new(1, 5.0, BarrierKind::Low));
        assert_eq!(choose_intent(&state), Some(Intent::Jump));
    }

    #[test]
    fn test_slides_under_high_barrier() {
        let mut state = playing();
        state.world.barriers.push(Barrier::new(1, 5.0, BarrierKind::High));
        assert_eq!(choose_intent(&state), Some(Intent::Slide));
    }

    #[test]
    fn test_sidesteps_train_toward_clear_lane() {
        let mut state = playing();
        state.world.trains.push(Train::new(1, 8.0, 12.0, TRAIN_COLORS[0]));
        state.world.trains.push(Train::new(0, 10.0, 12.0, TRAIN_COLORS[1]));
        assert_eq!(choose_intent(&state), Some(Intent::MoveRight));
    }

    #[test]
    fn test_dodges_a_train_end_to_end() {
        let mut state = playing();
        state.world.trains.push(Train::new(1, 20.0, 12.0, TRAIN_COLORS[0]));
        for _ in 0..60 {
            if let Some(intent) = choose_intent(&state) {
                apply_intent(&mut state, intent);
            }
            // Only the hand-placed train matters here
            state.world.trains.retain(|t| t.lane == 1 && t.length == 12.0);
            state.world.barriers.clear();
            tick(&mut state, 1.0 / 60.0);
        }
        assert!(!state.player.dead);
        assert_ne!(state.player.lane, 1);
    }
}
