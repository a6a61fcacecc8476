//! Player preferences
//!
//! Stored as individual key-value fields next to the records.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, keys};

/// Playable characters (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    Jake,
    Tricky,
    Fresh,
    Spike,
}

/// Outfit colours used when drawing the runner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub hoodie: [f32; 4],
    pub cap: [f32; 4],
    pub skin: [f32; 4],
    pub pants: [f32; 4],
    pub shoes: [f32; 4],
}

const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

impl Character {
    pub const ALL: [Character; 4] = [
        Character::Jake,
        Character::Tricky,
        Character::Fresh,
        Character::Spike,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Character::Jake => "jake",
            Character::Tricky => "tricky",
            Character::Fresh => "fresh",
            Character::Spike => "spike",
        }
    }

    /// Look up by id; unknown ids fall back to the default character
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        match self {
            Character::Jake => Palette {
                hoodie: rgb(0x3b82f6),
                cap: rgb(0xef4444),
                skin: rgb(0xf5c6a0),
                pants: rgb(0x374151),
                shoes: rgb(0xef4444),
            },
            Character::Tricky => Palette {
                hoodie: rgb(0x10b981),
                cap: rgb(0xfbbf24),
                skin: rgb(0xd4a574),
                pants: rgb(0x1f2937),
                shoes: rgb(0xfbbf24),
            },
            Character::Fresh => Palette {
                hoodie: rgb(0x8b5cf6),
                cap: rgb(0xffffff),
                skin: rgb(0x8d6e4c),
                pants: rgb(0x111827),
                shoes: rgb(0x8b5cf6),
            },
            Character::Spike => Palette {
                hoodie: rgb(0xef4444),
                cap: rgb(0x111827),
                skin: rgb(0xf5c6a0),
                pants: rgb(0x1f2937),
                shoes: rgb(0x111827),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub character: Character,
    pub sound_enabled: bool,
    /// True until the first run has started (shows the tutorial)
    pub first_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character: Character::Jake,
            sound_enabled: true,
            first_run: true,
        }
    }
}

impl Settings {
    pub fn load(storage: &impl Storage) -> Self {
        let character = storage
            .get(keys::CHARACTER)
            .map(|id| Character::from_id(&id))
            .unwrap_or_default();
        // Only an explicit "false" turns sound off
        let sound_enabled = storage.get(keys::SOUND).as_deref() != Some("false");
        let first_run = storage.get(keys::PLAYED).as_deref() != Some("true");

        Self {
            character,
            sound_enabled,
            first_run,
        }
    }

    pub fn save(&self, storage: &mut impl Storage) {
        storage.set(keys::CHARACTER, self.character.id());
        storage.set(keys::SOUND, if self.sound_enabled { "true" } else { "false" });
        if !self.first_run {
            storage.set(keys::PLAYED, "true");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_character_ids() {
        for c in Character::ALL {
            assert_eq!(Character::from_id(c.id()), c);
        }
        assert_eq!(Character::from_id("nobody"), Character::Jake);
    }

    #[test]
    fn test_defaults_from_empty_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_roundtrip() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            character: Character::Fresh,
            sound_enabled: false,
            first_run: false,
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_sound_only_off_when_explicit() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::SOUND, "maybe");
        assert!(Settings::load(&storage).sound_enabled);
    }

    #[test]
    fn test_palette_colors() {
        let p = Character::Jake.palette();
        assert_eq!(p.cap, rgb(0xef4444));
        assert!((p.hoodie[2] - 0xf6 as f32 / 255.0).abs() < 1e-6);
    }
}
