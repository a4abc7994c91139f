//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per [`update`] call, no internal pacing
//! - Seeded RNG only
//! - Stable iteration order (insertion order of falling objects)
//! - No rendering or input-device dependencies

pub mod rect;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::{Emitter, FallingObject, GameState, Player};
pub use tick::{Action, update};
