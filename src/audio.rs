//! Audio cues using the Web Audio API
//!
//! Every cue is a handful of short oscillator tones, no sample files. Tones
//! that play after a delay are scheduled on the audio clock so nothing here
//! needs a timer.

use crate::sim::AudioCue;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
}

/// One enveloped tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Seconds
    pub duration: f32,
    pub wave: Wave,
    pub volume: f32,
    /// Offset from the cue start, seconds
    pub delay: f32,
}

const fn tone(freq: f32, duration: f32, wave: Wave, volume: f32, delay: f32) -> Tone {
    Tone {
        freq,
        duration,
        wave,
        volume,
        delay,
    }
}

const COIN: [Tone; 2] = [
    tone(880.0, 0.08, Wave::Sine, 0.12, 0.0),
    tone(1320.0, 0.08, Wave::Sine, 0.08, 0.04),
];
const JUMP: [Tone; 2] = [
    tone(350.0, 0.12, Wave::Sine, 0.08, 0.0),
    tone(550.0, 0.08, Wave::Sine, 0.06, 0.05),
];
const SLIDE: [Tone; 1] = [tone(180.0, 0.18, Wave::Sawtooth, 0.04, 0.0)];
const CRASH: [Tone; 2] = [
    tone(90.0, 0.5, Wave::Sawtooth, 0.15, 0.0),
    tone(70.0, 0.6, Wave::Square, 0.1, 0.0),
];
const SWIPE: [Tone; 1] = [tone(400.0, 0.06, Wave::Sine, 0.04, 0.0)];
/// Rising C-major arpeggio
const POWER_UP: [Tone; 4] = [
    tone(523.0, 0.12, Wave::Sine, 0.1, 0.0),
    tone(659.0, 0.12, Wave::Sine, 0.1, 0.07),
    tone(784.0, 0.12, Wave::Sine, 0.1, 0.14),
    tone(1047.0, 0.12, Wave::Sine, 0.1, 0.21),
];

/// Tones that make up a cue
pub fn tones(cue: AudioCue) -> &'static [Tone] {
    match cue {
        AudioCue::Coin => &COIN,
        AudioCue::Jump => &JUMP,
        AudioCue::Slide => &SLIDE,
        AudioCue::Crash => &CRASH,
        AudioCue::Swipe => &SWIPE,
        AudioCue::PowerUp => &POWER_UP,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{Tone, Wave, tones};
    use crate::sim::AudioCue;

    /// Fire-and-forget cue player; a missing AudioContext disables sound
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        enabled: bool,
    }

    impl AudioManager {
        pub fn new(enabled: bool) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, enabled }
        }

        /// Resume the context (browsers require a user gesture first)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        pub fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled && self.ctx.is_some()
        }

        pub fn play(&self, cue: AudioCue) {
            if !self.enabled {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let now = ctx.current_time();
            for t in tones(cue) {
                if Self::play_tone(ctx, t, now).is_none() {
                    log::warn!("Failed to schedule {:?} tone", cue);
                    return;
                }
            }
        }

        fn play_tone(ctx: &AudioContext, tone: &Tone, now: f64) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let start = now + tone.delay as f64;
            let end = start + tone.duration as f64;
            osc.frequency().set_value_at_time(tone.freq, start).ok()?;
            gain.gain().set_value_at_time(tone.volume, start).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, end)
                .ok()?;

            osc.start_with_when(start).ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }
}
