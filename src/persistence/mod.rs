//! Key-value persistence backends
//!
//! Records and settings are stored as plain string fields. The browser build
//! uses LocalStorage; native builds and tests use an in-memory map.

use std::collections::HashMap;
use std::str::FromStr;

/// Storage keys
pub mod keys {
    pub const BEST_SCORE: &str = "rr_highscore";
    pub const TOTAL_COINS: &str = "rr_coins";
    pub const CHARACTER: &str = "rr_char";
    pub const SOUND: &str = "rr_sound";
    pub const PLAYED: &str = "rr_played";
}

/// Minimal string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);

    /// Parse a stored value, treating garbage as missing
    fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let raw = self.get(key)?;
        match raw.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unparsable stored value for {}: {:?}", key, raw);
                None
            }
        }
    }
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage; missing or blocked storage degrades to no-ops
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {} to LocalStorage", key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut s = MemoryStorage::new();
        assert!(s.is_empty());
        assert_eq!(s.get(keys::BEST_SCORE), None);
        s.set(keys::BEST_SCORE, "42");
        assert_eq!(s.get(keys::BEST_SCORE).as_deref(), Some("42"));
        s.set(keys::BEST_SCORE, "43");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_get_parsed_rejects_garbage() {
        let mut s = MemoryStorage::new();
        s.set(keys::TOTAL_COINS, " 17 ");
        assert_eq!(s.get_parsed::<u64>(keys::TOTAL_COINS), Some(17));
        s.set(keys::TOTAL_COINS, "lots");
        assert_eq!(s.get_parsed::<u64>(keys::TOTAL_COINS), None);
    }
}
