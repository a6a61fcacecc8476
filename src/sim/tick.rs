//! Per-frame simulation tick
//!
//! Advances the run by one variable `dt` (capped), in a fixed order: clock and
//! speed, scroll and score, timers, player, world, particles, collisions, magnet.

use glam::Vec3;

use super::collision::{boxes_overlap, within_tolerance};
use super::events::{AudioCue, GameEvent};
use super::state::{GamePhase, GameState, PowerUpKind, bursts};
use crate::consts::*;
use crate::lerp;

/// Discrete player intents from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
    /// Toggle pause
    Pause,
}

impl Intent {
    /// Sound played when the intent is accepted
    pub fn cue(&self) -> Option<AudioCue> {
        match self {
            Intent::MoveLeft | Intent::MoveRight => Some(AudioCue::Swipe),
            Intent::Jump => Some(AudioCue::Jump),
            Intent::Slide => Some(AudioCue::Slide),
            Intent::Pause => None,
        }
    }
}

/// Apply an intent; returns `true` only if it changed state
///
/// Accepted movement intents queue their audio cue.
pub fn apply_intent(state: &mut GameState, intent: Intent) -> bool {
    if intent == Intent::Pause {
        return toggle_pause(state);
    }
    if state.phase != GamePhase::Playing || state.player.dead {
        return false;
    }

    let changed = match intent {
        Intent::MoveLeft => state.player.move_left(),
        Intent::MoveRight => state.player.move_right(),
        Intent::Jump => state.player.jump(),
        Intent::Slide => state.player.slide(),
        Intent::Pause => false,
    };
    if changed {
        state.cues.extend(intent.cue());
    }
    changed
}

fn toggle_pause(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            log::info!("Paused at distance {:.0}", state.distance);
            true
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            log::info!("Resumed");
            true
        }
        GamePhase::Menu | GamePhase::GameOver => false,
    }
}

/// Advance the simulation by `dt` seconds; only runs while playing
pub fn tick(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let dt = dt.clamp(0.0, state.tuning.max_frame_dt);

    state.time += dt;
    state.speed = state.tuning.speed_at(state.time);

    let step = state.speed * dt;
    state.scroll_offset += step;
    state.distance += step;
    state.score += (step * state.score_multiplier() as f32).floor() as u64;

    update_timers(state, dt);

    state.player.update(dt, &state.tuning);
    state.world.update(state.speed, dt, &state.tuning);
    state.particles.update(dt);

    detect_collisions(state);

    if state.player.has_magnet {
        apply_magnet(state);
    }
}

/// Keep cosmetic effects alive once the run has ended
pub fn tick_effects(state: &mut GameState, dt: f32) {
    let dt = dt.clamp(0.0, state.tuning.max_frame_dt);
    update_timers(state, dt);
    state.particles.update(dt);
}

fn update_timers(state: &mut GameState, dt: f32) {
    if state.shake_time > 0.0 {
        state.shake_time = (state.shake_time - dt).max(0.0);
    }
    if state.notification.is_some() {
        state.notification_time = (state.notification_time - dt).max(0.0);
        if state.notification_time <= 0.0 {
            state.notification = None;
        }
    }
}

/// Coins, then power-ups, then obstacles (first hit ends the scan)
pub(crate) fn detect_collisions(state: &mut GameState) {
    collect_coins(state);
    collect_powerups(state);

    if state.player.dead || state.player.is_invulnerable() {
        return;
    }

    let player_box = state.player.hitbox();
    let hit = state
        .world
        .trains
        .iter()
        .map(|t| t.hitbox())
        .chain(state.world.barriers.iter().map(|b| b.hitbox()))
        .any(|obstacle| boxes_overlap(&player_box, &obstacle));

    if hit {
        game_over(state);
    }
}

fn collect_coins(state: &mut GameState) {
    let anchor = Vec3::new(
        state.player.x,
        state.player.y + COIN_COLLECT_OFFSET_Y,
        COLLECT_Z,
    );
    let tolerance = Vec3::from_array(COIN_COLLECT_TOLERANCE);

    let mut picked = Vec::new();
    for coin in state.world.coins.iter_mut().filter(|c| !c.collected) {
        if within_tolerance(coin.pos(), anchor, tolerance) {
            coin.collected = true;
            picked.push(coin.pos());
        }
    }

    let value = state.tuning.coin_value;
    for pos in picked {
        state.coins += value;
        state.events.push(GameEvent::CoinCollected { value });
        state.cues.push(AudioCue::Coin);
        state.burst_at(pos, bursts::COIN);
    }
}

fn collect_powerups(state: &mut GameState) {
    let anchor = Vec3::new(
        state.player.x,
        state.player.y + POWERUP_COLLECT_OFFSET_Y,
        COLLECT_Z,
    );
    let tolerance = Vec3::from_array(POWERUP_COLLECT_TOLERANCE);

    let mut picked = Vec::new();
    for pu in state.world.powerups.iter_mut().filter(|p| !p.collected) {
        if within_tolerance(pu.pos(), anchor, tolerance) {
            pu.collected = true;
            picked.push((pu.kind, pu.pos()));
        }
    }

    for (kind, pos) in picked {
        state.cues.push(AudioCue::PowerUp);
        activate_powerup(state, kind);
        state.burst_at(pos, bursts::POWERUP);
    }
}

/// Turn on a buff for its full duration; re-triggering restarts the timer
pub fn activate_powerup(state: &mut GameState, kind: PowerUpKind) {
    let duration = kind.duration(&state.tuning);
    match kind {
        PowerUpKind::Magnet => state.player.activate_magnet(duration),
        PowerUpKind::Multiplier => state.player.activate_multiplier(duration),
        PowerUpKind::Jetpack => state.player.activate_jetpack(duration),
    }
    state.show_notification(kind.notification());
    state.events.push(GameEvent::PowerUpCollected(kind));
    log::debug!("Power-up {:?} for {:.1}s", kind, duration);
}

fn game_over(state: &mut GameState) {
    state.player.dead = true;
    state.phase = GamePhase::GameOver;
    state.shake_time = state.tuning.shake_duration;
    state.cues.push(AudioCue::Crash);

    let anchor = Vec3::new(state.player.x, state.player.y + 1.0, PLAYER_DRAW_Z);
    state.burst_at(anchor, bursts::CRASH_SPARKS);
    state.burst_at(anchor, bursts::CRASH_EMBERS);

    state.events.push(GameEvent::Crashed {
        score: state.score,
        coins: state.coins,
    });
    log::info!(
        "Crashed: score {} coins {} distance {:.0}",
        state.score,
        state.coins,
        state.distance
    );
}

/// Pull nearby coins toward the player's x and toward z = 0 (per tick)
fn apply_magnet(state: &mut GameState) {
    let px = state.player.x;
    let range = state.tuning.magnet_range;
    let (pull_x, pull_z) = (state.tuning.magnet_pull_x, state.tuning.magnet_pull_z);

    for coin in state.world.coins.iter_mut().filter(|c| !c.collected) {
        let dx = (coin.x - px).abs();
        if dx < range && coin.z > 0.0 && coin.z < range * 2.0 {
            coin.x = lerp(coin.x, px, pull_x);
            coin.z = lerp(coin.z, 0.0, pull_z);
        }
    }
}
