//! Game session: the explicitly constructed context for one player
//!
//! Owns the simulation state plus everything around it that outlives a run:
//! records, settings, the storage they live in, the frame clock, and the
//! delayed-event queue. Front ends (the wasm game loop, the native headless
//! runner, tests) drive it with timestamps and intents and read back cues,
//! events, and the HUD snapshot.

use crate::highscores::Records;
use crate::persistence::Storage;
use crate::settings::{Character, Settings};
use crate::sim::{
    AudioCue, DelayedQueue, GameEvent, GamePhase, GameState, Intent, apply_intent, choose_intent,
    tick, tick_effects,
};
use crate::tuning::Tuning;
use crate::ui::HudSnapshot;

pub struct Session<S: Storage> {
    state: GameState,
    storage: S,
    records: Records,
    settings: Settings,
    /// Timestamp of the previous frame; `None` right after start/resume
    last_timestamp: Option<f64>,
    delayed: DelayedQueue,
    events: Vec<GameEvent>,
    cues: Vec<AudioCue>,
    /// Demo mode: the autopilot plays
    autopilot: bool,
}

impl<S: Storage> Session<S> {
    /// Load records and settings, and sit on the menu
    pub fn new(storage: S, tuning: Tuning, seed: u64) -> Self {
        let records = Records::load(&storage);
        let settings = Settings::load(&storage);
        log::info!(
            "Session ready: character {}, sound {}",
            settings.character.id(),
            if settings.sound_enabled { "on" } else { "off" }
        );
        Self {
            state: GameState::new(seed, tuning),
            storage,
            records,
            settings,
            last_timestamp: None,
            delayed: DelayedQueue::new(),
            events: Vec::new(),
            cues: Vec::new(),
            autopilot: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for front ends and tests that stage scenes directly
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Begin a fresh run
    pub fn start_run(&mut self, seed: u64) {
        self.state.restart(seed);
        self.delayed.clear();
        self.last_timestamp = None;
        if self.settings.first_run {
            self.settings.first_run = false;
            self.settings.save(&mut self.storage);
        }
        log::info!("Run started (seed {})", seed);
    }

    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        apply_intent(&mut self.state, Intent::Pause)
    }

    /// Resume a paused run; the next frame starts with dt = 0
    pub fn resume(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.last_timestamp = None;
        apply_intent(&mut self.state, Intent::Pause)
    }

    /// Forward an intent; `true` if it changed anything
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Pause => match self.state.phase {
                GamePhase::Playing => self.pause(),
                GamePhase::Paused => self.resume(),
                GamePhase::Menu | GamePhase::GameOver => false,
            },
            _ => apply_intent(&mut self.state, intent),
        }
    }

    /// Advance one display frame; returns the wall-clock dt used
    pub fn frame(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        match self.state.phase {
            GamePhase::Playing => {
                if self.autopilot {
                    if let Some(intent) = choose_intent(&self.state) {
                        apply_intent(&mut self.state, intent);
                    }
                }
                tick(&mut self.state, dt);
            }
            GamePhase::GameOver => tick_effects(&mut self.state, dt),
            GamePhase::Menu | GamePhase::Paused => {}
        }

        self.process_events(dt);
        dt
    }

    fn process_events(&mut self, dt: f32) {
        self.cues.append(&mut self.state.cues);

        // Events scheduled this frame start counting from the next one
        self.events.extend(self.delayed.advance(dt));

        let raised: Vec<GameEvent> = self.state.events.drain(..).collect();
        for event in raised {
            if let GameEvent::Crashed { score, coins } = event {
                self.finish_run(score, coins);
            }
            self.events.push(event);
        }
    }

    fn finish_run(&mut self, score: u64, coins: u32) {
        let new_best = self.records.record_run(score, coins);
        self.records.save(&mut self.storage);
        if new_best {
            log::info!("New best score: {}", score);
        }
        self.delayed.schedule(
            self.state.tuning.game_over_delay,
            GameEvent::ShowGameOver {
                score,
                coins,
                best: self.records.best_score,
                new_best,
            },
        );
    }

    /// Recompute projection constants for a new viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.camera.resize(width, height);
        log::info!(
            "Viewport {}x{}",
            self.state.camera.width,
            self.state.camera.height
        );
    }

    /// Flip sound on/off and persist; returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.settings.save(&mut self.storage);
        self.settings.sound_enabled
    }

    pub fn select_character(&mut self, character: Character) {
        self.settings.character = character;
        self.settings.save(&mut self.storage);
    }

    /// Audio cues raised since the last drain (empty while muted)
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        let cues = std::mem::take(&mut self.cues);
        if self.settings.sound_enabled {
            cues
        } else {
            Vec::new()
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from_state(&self.state)
    }
}
