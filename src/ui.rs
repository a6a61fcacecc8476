//! HUD snapshot
//!
//! A plain-data view of what the overlay shows each frame. The wasm front end
//! copies it into the DOM; tests read it directly.

use serde::Serialize;

use crate::sim::{GameState, PowerUpKind};

/// The one buff shown in the power-up indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub icon: &'static str,
    pub label: &'static str,
    /// Remaining time as a fraction of the full duration, 0..=1
    pub remaining: f32,
}

impl ActivePowerUp {
    fn new(kind: PowerUpKind, time_left: f32, duration: f32) -> Self {
        let (icon, label) = match kind {
            PowerUpKind::Magnet => ("🧲", "Magnet"),
            PowerUpKind::Multiplier => ("×2", "Double"),
            PowerUpKind::Jetpack => ("🚀", "Jetpack"),
        };
        let remaining = if duration > 0.0 {
            (time_left / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            kind,
            icon,
            label,
            remaining,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub coins: u32,
    pub multiplier: bool,
    pub power_up: Option<ActivePowerUp>,
    pub notification: Option<String>,
    pub notification_time: f32,
    /// Screen shake in pixels
    pub shake: f32,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let player = &state.player;
        let tuning = &state.tuning;

        // Magnet wins over jetpack, jetpack over multiplier
        let power_up = if player.has_magnet {
            Some(ActivePowerUp::new(
                PowerUpKind::Magnet,
                player.magnet_time,
                tuning.magnet_duration,
            ))
        } else if player.has_jetpack {
            Some(ActivePowerUp::new(
                PowerUpKind::Jetpack,
                player.jetpack_time,
                tuning.jetpack_duration,
            ))
        } else if player.has_multiplier {
            Some(ActivePowerUp::new(
                PowerUpKind::Multiplier,
                player.multiplier_time,
                tuning.multiplier_duration,
            ))
        } else {
            None
        };

        Self {
            score: state.score,
            coins: state.coins,
            multiplier: player.has_multiplier,
            power_up,
            notification: state.notification.clone(),
            notification_time: state.notification_time,
            shake: state.shake_intensity(),
        }
    }
}

/// Thousands separators, e.g. 12345 -> "12,345"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_power_up_precedence() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(HudSnapshot::from_state(&state).power_up, None);

        state.player.activate_multiplier(8.0);
        state.player.activate_jetpack(6.0);
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.power_up.as_ref().map(|p| p.kind), Some(PowerUpKind::Jetpack));
        assert!(hud.multiplier);

        state.player.activate_magnet(4.0);
        let hud = HudSnapshot::from_state(&state);
        let shown = hud.power_up.expect("magnet shown");
        assert_eq!(shown.kind, PowerUpKind::Magnet);
        assert_eq!(shown.label, "Magnet");
        assert!((shown.remaining - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_shake_and_notification() {
        let mut state = GameState::new(1, Tuning::default());
        state.shake_time = 0.2;
        state.show_notification("JETPACK!");
        let hud = HudSnapshot::from_state(&state);
        assert!((hud.shake - 3.0).abs() < 1e-5);
        assert_eq!(hud.notification.as_deref(), Some("JETPACK!"));
        assert_eq!(hud.notification_time, 2.0);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
