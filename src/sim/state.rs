//! Game state and world entity types
//!
//! Everything the tick mutates lives in [`GameState`]. Entities are plain data
//! with pure hitbox helpers; nothing here knows about drawing.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::events::{AudioCue, GameEvent};
use super::player::Player;
use super::projection::Camera;
use super::world::WorldGenerator;
use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Home screen, nothing is simulated
    Menu,
    /// Active run
    Playing,
    /// Run frozen, state preserved for exact resumption
    Paused,
    /// Player crashed; particles and delayed events still run
    GameOver,
}

/// Livery colours for trains
pub const TRAIN_COLORS: [[f32; 4]; 8] = [
    [0.91, 0.30, 0.24, 1.0],
    [0.20, 0.60, 0.86, 1.0],
    [0.18, 0.80, 0.44, 1.0],
    [0.95, 0.61, 0.07, 1.0],
    [0.61, 0.35, 0.71, 1.0],
    [0.90, 0.49, 0.13, 1.0],
    [0.10, 0.74, 0.61, 1.0],
    [0.91, 0.26, 0.58, 1.0],
];

/// A train occupying one lane from `z` to `z + length`
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub lane: usize,
    pub z: f32,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
}

impl Train {
    pub fn new(lane: usize, z: f32, length: f32, color: [f32; 4]) -> Self {
        Self {
            lane,
            z,
            length,
            width: TRAIN_WIDTH,
            height: TRAIN_HEIGHT,
            color,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        lane_x(self.lane)
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::centered_x(self.x(), 0.0, self.z, self.width, self.height, self.length)
    }

    /// Depth used for back-to-front ordering
    pub fn sort_z(&self) -> f32 {
        self.z + self.length / 2.0
    }
}

/// Barrier variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierKind {
    /// Jump over it
    Low,
    /// Slide under it
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pub lane: usize,
    pub z: f32,
    pub width: f32,
    pub kind: BarrierKind,
}

impl Barrier {
    pub fn new(lane: usize, z: f32, kind: BarrierKind) -> Self {
        Self {
            lane,
            z,
            width: BARRIER_WIDTH,
            kind,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        lane_x(self.lane)
    }

    /// Visual height
    pub fn height(&self) -> f32 {
        match self.kind {
            BarrierKind::Low => BARRIER_LOW_HEIGHT,
            BarrierKind::High => BARRIER_HIGH_HEIGHT,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        match self.kind {
            BarrierKind::Low => Hitbox::centered_x(
                self.x(),
                0.0,
                self.z,
                self.width,
                BARRIER_LOW_HEIGHT,
                BARRIER_DEPTH,
            ),
            BarrierKind::High => Hitbox::centered_x(
                self.x(),
                BARRIER_HIGH_Y,
                self.z,
                self.width,
                BARRIER_HIGH_HITBOX_HEIGHT,
                BARRIER_DEPTH,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub collected: bool,
    /// Bob/spin animation phase (radians)
    pub phase: f32,
}

impl Coin {
    pub fn new(x: f32, y: f32, z: f32, phase: f32) -> Self {
        Self {
            x,
            y,
            z,
            collected: false,
            phase,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Magnet,
    Multiplier,
    Jetpack,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Magnet,
        PowerUpKind::Multiplier,
        PowerUpKind::Jetpack,
    ];

    /// Banner shown when collected
    pub fn notification(&self) -> &'static str {
        match self {
            PowerUpKind::Magnet => "COIN MAGNET!",
            PowerUpKind::Multiplier => "×2 SCORE!",
            PowerUpKind::Jetpack => "JETPACK!",
        }
    }

    pub fn duration(&self, tuning: &Tuning) -> f32 {
        match self {
            PowerUpKind::Magnet => tuning.magnet_duration,
            PowerUpKind::Multiplier => tuning.multiplier_duration,
            PowerUpKind::Jetpack => tuning.jetpack_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub lane: usize,
    pub y: f32,
    pub z: f32,
    pub kind: PowerUpKind,
    pub collected: bool,
    pub phase: f32,
}

impl PowerUp {
    pub fn new(lane: usize, z: f32, kind: PowerUpKind, phase: f32) -> Self {
        Self {
            lane,
            y: POWERUP_HEIGHT,
            z,
            kind,
            collected: false,
            phase,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        lane_x(self.lane)
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x(), self.y, self.z)
    }
}

/// A screen-space particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    /// Remaining life in seconds
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Remaining life as a fraction, used for fading
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// Drawn size shrinks as the particle fades
    pub fn draw_size(&self) -> f32 {
        self.size * (0.5 + 0.5 * self.alpha())
    }
}

/// Parameters for a particle burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub color: [f32; 4],
    pub spread: f32,
    pub life: f32,
    pub size: f32,
}

/// Screen-space particles, purely cosmetic
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        }
    }

    /// Spray a burst of particles from a screen position, biased upward
    pub fn emit(&mut self, at: Vec2, burst: Burst) {
        for _ in 0..burst.count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * burst.spread,
                (self.rng.random::<f32>() - 0.85) * burst.spread,
            );
            let life = burst.life + self.rng.random::<f32>() * 0.3;
            self.particles.push(Particle {
                pos: at,
                vel,
                color: burst.color,
                life,
                max_life: life,
                size: burst.size + self.rng.random::<f32>() * 3.0,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

pub mod bursts {
    use super::Burst;

    pub const COIN: Burst = Burst {
        count: 6,
        color: [1.0, 0.84, 0.0, 1.0],
        spread: 80.0,
        life: 0.3,
        size: 3.0,
    };
    pub const POWERUP: Burst = Burst {
        count: 15,
        color: [1.0, 1.0, 1.0, 1.0],
        spread: 120.0,
        life: 0.5,
        size: 4.0,
    };
    pub const CRASH_SPARKS: Burst = Burst {
        count: 25,
        color: [1.0, 0.27, 0.27, 1.0],
        spread: 200.0,
        life: 0.8,
        size: 5.0,
    };
    pub const CRASH_EMBERS: Burst = Burst {
        count: 15,
        color: [1.0, 0.67, 0.0, 1.0],
        spread: 150.0,
        life: 0.6,
        size: 4.0,
    };
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub camera: Camera,
    pub player: Player,
    pub world: WorldGenerator,
    pub particles: ParticleSystem,

    pub score: u64,
    /// Coins picked up this run
    pub coins: u32,
    pub distance: f32,
    pub speed: f32,
    /// Total ground scrolled, drives track ties and scenery
    pub scroll_offset: f32,
    /// Seconds of active running
    pub time: f32,

    /// Remaining screen shake (seconds)
    pub shake_time: f32,
    pub notification: Option<String>,
    pub notification_time: f32,

    /// Events raised this tick, drained by the session
    pub events: Vec<GameEvent>,
    /// Sounds to play, drained by the session
    pub cues: Vec<AudioCue>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            camera: Camera::default(),
            player: Player::new(),
            world: WorldGenerator::new(seed),
            particles: ParticleSystem::new(seed),
            score: 0,
            coins: 0,
            distance: 0.0,
            speed: tuning.initial_speed,
            scroll_offset: 0.0,
            time: 0.0,
            shake_time: 0.0,
            notification: None,
            notification_time: 0.0,
            events: Vec::new(),
            cues: Vec::new(),
            tuning,
        }
    }

    /// Reset everything for a fresh run, keeping camera and tuning
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.phase = GamePhase::Playing;
        self.player.reset();
        self.world = WorldGenerator::new(seed);
        self.particles = ParticleSystem::new(seed);

        self.score = 0;
        self.coins = 0;
        self.distance = 0.0;
        self.speed = self.tuning.initial_speed;
        self.scroll_offset = 0.0;
        self.time = 0.0;

        self.shake_time = 0.0;
        self.notification = None;
        self.notification_time = 0.0;
        self.events.clear();
        self.cues.clear();
    }

    pub fn score_multiplier(&self) -> u64 {
        if self.player.has_multiplier { 2 } else { 1 }
    }

    pub fn show_notification(&mut self, text: &str) {
        self.notification = Some(text.to_string());
        self.notification_time = self.tuning.notification_duration;
    }

    /// Camera shake offset magnitude in pixels
    pub fn shake_intensity(&self) -> f32 {
        self.shake_time.max(0.0) * SHAKE_INTENSITY
    }

    /// Emit a particle burst anchored at a world position
    pub fn burst_at(&mut self, world: Vec3, burst: Burst) {
        let p = self.camera.project(world.x, world.y, world.z);
        self.particles.emit(p.pos(), burst);
    }
}
