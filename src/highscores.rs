//! Best score and lifetime coin total
//!
//! Read once at startup, written after every run.

use crate::persistence::{Storage, keys};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Records {
    pub best_score: u64,
    /// Coins collected across all runs
    pub total_coins: u64,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(storage: &impl Storage) -> Self {
        let records = Self {
            best_score: storage.get_parsed(keys::BEST_SCORE).unwrap_or(0),
            total_coins: storage.get_parsed(keys::TOTAL_COINS).unwrap_or(0),
        };
        log::info!(
            "Loaded records: best {} coins {}",
            records.best_score,
            records.total_coins
        );
        records
    }

    pub fn save(&self, storage: &mut impl Storage) {
        storage.set(keys::BEST_SCORE, &self.best_score.to_string());
        storage.set(keys::TOTAL_COINS, &self.total_coins.to_string());
    }

    /// Fold a finished run in; returns true for a new best
    pub fn record_run(&mut self, score: u64, coins: u32) -> bool {
        self.total_coins = self.total_coins.saturating_add(coins as u64);
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}
