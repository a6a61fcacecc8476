//! Platform abstraction layer
//!
//! Browser events are translated into simulation intents here so the wasm
//! entry point only forwards raw keys and touch coordinates.

pub mod input;

pub use input::{SwipeTracker, classify_swipe, key_to_intent};
