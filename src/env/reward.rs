//! Reward shaping
//!
//! Dense per-tick signal that steers the policy under the lowest object
//! still above the player row, with a flat bonus for actually catching one.
//! Alignment is rewarded, thrashing is penalized, and a catch overrides
//! everything for that tick.

use std::cmp::Ordering;

use super::observation::Observation;
use crate::settings::GameConfig;

/// Flat reward on the tick an object is caught; overrides the shaped signal
pub const CATCH_REWARD: f32 = 10.0;

/// Bonus for standing under an object before it reaches the player row
pub const PROACTIVE_BONUS: f32 = 0.3;

/// Weight of the per-tick movement penalty
pub const MOVE_PENALTY_WEIGHT: f32 = 0.5;

/// Stateful reward computation: remembers the previous player x to penalize
/// thrashing.
#[derive(Debug, Clone)]
pub struct RewardShaper {
    last_player_x: f32,
}

impl RewardShaper {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            last_player_x: config.player_start_x(),
        }
    }

    /// Forget movement history at episode start.
    pub fn reset(&mut self, config: &GameConfig) {
        self.last_player_x = config.player_start_x();
    }

    /// Compute this tick's reward.
    ///
    /// `caught` is the core's one-tick collision pulse; when set, the flat
    /// [`CATCH_REWARD`] takes absolute precedence and the movement history is
    /// left untouched. The history is also untouched when no projectile is
    /// active; it only advances when a shaped reward was actually computed.
    pub fn compute(&mut self, obs: &Observation, config: &GameConfig, caught: bool) -> f32 {
        if caught {
            return CATCH_REWARD;
        }

        let mut active: Vec<[f32; 2]> = obs
            .projectiles
            .iter()
            .zip(&obs.mask)
            .filter(|&(_, &m)| m == 1)
            .map(|(&pair, _)| pair)
            .collect();
        if active.is_empty() {
            return 0.0;
        }

        // Closest-to-bottom first, then take the first one still strictly
        // above the player row. Objects at or past the row are about to
        // resolve via collision, not steering.
        active.sort_by(|a, b| b[1].partial_cmp(&a[1]).unwrap_or(Ordering::Equal));
        let mut closest = [0.0_f32, 0.0];
        for pair in &active {
            if config.player_y > pair[1] {
                closest = *pair;
                break;
            }
        }

        let player_x = obs.player[0];
        let player_center_x = player_x + config.player_width / 2.0;
        let object_center_x = closest[0] + config.object_width / 2.0;
        let object_center_y = closest[1] - config.object_height / 2.0;

        let x_gap = (player_center_x - object_center_x).abs();
        let mut reward = 1.0 - x_gap / config.screen_width;

        if x_gap < config.object_width && object_center_y < config.player_y {
            reward += PROACTIVE_BONUS;
        }

        reward -= MOVE_PENALTY_WEIGHT * (player_x - self.last_player_x).abs() / config.screen_width;

        self.last_player_x = player_x;
        reward
    }
}
