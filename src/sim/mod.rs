//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (entity vectors, insertion order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod player;
pub mod projection;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::choose_intent;
pub use collision::{Hitbox, boxes_overlap};
pub use events::{AudioCue, DelayedQueue, GameEvent};
pub use player::Player;
pub use projection::{Camera, ScreenPoint};
pub use state::{
    Barrier, BarrierKind, Coin, GamePhase, GameState, Particle, PowerUp, PowerUpKind, Train,
};
pub use tick::{Intent, activate_powerup, apply_intent, tick, tick_effects};
pub use world::{Pattern, SceneObject, WorldGenerator};
