//! Fixed-shape observation encoding
//!
//! The active-object count varies per tick but the consumer needs a fixed
//! shape, so projectile slots are padded with a sentinel pair and a parallel
//! validity mask marks which slots are real. Coordinates are raw pixel
//! values; no normalization is applied anywhere in the contract.

use serde::{Deserialize, Serialize};

use crate::settings::GameConfig;
use crate::sim::GameState;

/// Sentinel written into padded projectile slots
pub const PAD_PAIR: [f32; 2] = [0.0, 0.0];

/// One tick's view of the game for the policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Player top-left `(x, y)`; y is the fixed player row
    pub player: [f32; 2],
    /// `max_projectiles` coordinate pairs, active entries first in stored
    /// order, the rest [`PAD_PAIR`]
    pub projectiles: Vec<[f32; 2]>,
    /// `1` for each active slot, `0` for padding
    pub mask: Vec<u8>,
}

impl Observation {
    /// Encode the current state into `config.max_projectiles` slots.
    pub fn encode(state: &GameState, config: &GameConfig) -> Self {
        let slots = config.max_projectiles;
        let mut projectiles = Vec::with_capacity(slots);
        let mut mask = Vec::with_capacity(slots);

        for obj in state.falling_objects.iter().take(slots) {
            projectiles.push([obj.pos.x, obj.pos.y]);
            mask.push(1);
        }
        while projectiles.len() < slots {
            projectiles.push(PAD_PAIR);
            mask.push(0);
        }

        Self {
            player: [state.player.x, config.player_y],
            projectiles,
            mask,
        }
    }

    /// Number of active (non-padding) slots
    pub fn active_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m == 1).count()
    }

    /// Flatten to `[player_x, player_y, x0, y0, .., mask0, ..]` for
    /// consumers that want a single vector input.
    pub fn flatten(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(2 + self.projectiles.len() * 2 + self.mask.len());
        out.extend_from_slice(&self.player);
        for pair in &self.projectiles {
            out.extend_from_slice(pair);
        }
        out.extend(self.mask.iter().map(|&m| f32::from(m)));
        out
    }

    /// Length of [`flatten`](Observation::flatten)'s output for a given slot
    /// count
    pub fn flat_len(slots: usize) -> usize {
        2 + slots * 3
    }
}
