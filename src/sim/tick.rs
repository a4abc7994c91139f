//! One-tick state advance
//!
//! [`update`] is the single ingestion point for control input: manual play
//! converts key state to an [`Action`] via [`Action::from_held_keys`] and the
//! RL adapter passes its action straight through, so the core never knows who
//! is driving.
//!
//! Per-object resolution order inside a tick is load-bearing: each object
//! first advances, then the floor test runs, then the overlap test runs
//! unconditionally. An object that crosses the floor and overlaps the player
//! on the same tick is therefore still removed and scored (the floor crossing
//! has already ended the run). Tests pin this ordering; do not reorder the
//! two checks.

use serde::{Deserialize, Serialize};

use super::state::{FallingObject, GameState};
use crate::consts::SPEED_MULT;
use crate::settings::GameConfig;

/// Discrete control input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Action {
    /// No horizontal movement
    #[default]
    Stay = 0,
    /// Move left by `player_speed`
    Left = 1,
    /// Move right by `player_speed`
    Right = 2,
}

impl Action {
    /// Decode the wire encoding (`0` stay, `1` left, `2` right). Anything
    /// else is not an action.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Action::Stay),
            1 => Some(Action::Left),
            2 => Some(Action::Right),
            _ => None,
        }
    }

    /// Wire encoding of this action
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Collapse held-key state into one action. Opposing keys cancel.
    pub fn from_held_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Action::Left,
            (false, true) => Action::Right,
            _ => Action::Stay,
        }
    }
}

/// Advance the game by exactly one tick.
///
/// The caller must not call this again once `state.running` has gone false
/// without an intervening [`GameState::restart`]; the environment adapter
/// enforces that contract.
pub fn update(state: &mut GameState, config: &GameConfig, action: Action) {
    state.temp_collision_det = false;
    state.time_ticks += 1;

    // Player movement, absorbed silently at the walls
    let dx = match action {
        Action::Stay => 0.0,
        Action::Left => -config.player_speed,
        Action::Right => config.player_speed,
    };
    state.player.x = (state.player.x + dx).clamp(config.player_min_x(), config.player_max_x());

    // Emitter advance, with a velocity burst on every tenth catch
    // (score 0 included)
    let mult = if state.score % 10 == 0 { SPEED_MULT } else { 1.0 };
    state.emitter.pos += state.emitter.vel * mult;

    if state.emitter.pos.x <= 0.0
        || state.emitter.pos.x >= config.screen_width - config.emitter_width
    {
        state.emitter.vel.x = -state.emitter.vel.x;
    }
    if state.emitter.pos.y <= 0.0 || state.emitter.pos.y >= config.emitter_max_y() {
        state.emitter.vel.y = -state.emitter.vel.y;
    }

    // Spawn roll happens every tick so the RNG stream does not depend on the
    // active-object count; the cap only gates the push.
    let spawn_roll = {
        use rand::Rng;
        state.rng.random_range(0..config.spawn_odds()) == 0
    };
    if spawn_roll && state.falling_objects.len() < config.max_projectiles {
        state.falling_objects.push(FallingObject {
            pos: state.emitter.drop_point(config),
        });
    }

    // Advance objects, rebuilding the list with survivors rather than
    // removing mid-iteration.
    let player_rect = state.player.rect(config);
    let objects = std::mem::take(&mut state.falling_objects);
    let mut survivors = Vec::with_capacity(objects.len());
    for mut obj in objects {
        obj.pos.y += config.object_speed;

        if obj.pos.y >= config.floor_y() {
            if state.running {
                log::info!("game over, score {}", state.score);
            }
            state.running = false;
        }
        if player_rect.overlaps(&obj.rect(config)) {
            state.score += 1;
            state.temp_collision_det = true;
            continue;
        }
        survivors.push(obj);
    }
    state.falling_objects = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn test_config() -> GameConfig {
        GameConfig::default()
    }

    /// Drop an object directly into the state, bypassing the spawn roll.
    fn inject_object(state: &mut GameState, x: f32, y: f32) {
        state.falling_objects.push(FallingObject {
            pos: Vec2::new(x, y),
        });
    }

    #[test]
    fn action_wire_encoding() {
        assert_eq!(Action::from_index(0), Some(Action::Stay));
        assert_eq!(Action::from_index(1), Some(Action::Left));
        assert_eq!(Action::from_index(2), Some(Action::Right));
        assert_eq!(Action::from_index(3), None);
        assert_eq!(Action::Right.index(), 2);
    }

    #[test]
    fn held_keys_collapse_to_one_action() {
        assert_eq!(Action::from_held_keys(true, false), Action::Left);
        assert_eq!(Action::from_held_keys(false, true), Action::Right);
        assert_eq!(Action::from_held_keys(true, true), Action::Stay);
        assert_eq!(Action::from_held_keys(false, false), Action::Stay);
    }

    #[test]
    fn repeated_right_pins_player_at_exact_bound() {
        // 640-wide field, 100-wide player, no buffer, speed 7: fifty rights
        // from the 270 midpoint must land exactly on 540 and stay there.
        let config = GameConfig {
            screen_width: 640.0,
            pixel_buffer: 0.0,
            player_speed: 7.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&config, 3);
        assert_eq!(state.player.x, 270.0);

        for _ in 0..50 {
            update(&mut state, &config, Action::Right);
        }
        assert_eq!(state.player.x, 640.0 - 100.0);

        update(&mut state, &config, Action::Right);
        assert_eq!(state.player.x, 540.0);
    }

    #[test]
    fn left_movement_respects_buffer() {
        let config = test_config();
        let mut state = GameState::new(&config, 3);
        for _ in 0..100 {
            update(&mut state, &config, Action::Left);
        }
        assert_eq!(state.player.x, config.player_min_x());
    }

    #[test]
    fn emitter_reflects_at_horizontal_wall() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        state.emitter.pos = Vec2::new(1.0, 100.0);
        state.emitter.vel = Vec2::new(-2.0, 2.0);

        update(&mut state, &config, Action::Stay);
        assert!(state.emitter.vel.x > 0.0);
    }

    #[test]
    fn emitter_reflects_at_upper_third_boundary() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        state.emitter.pos = Vec2::new(200.0, config.emitter_max_y() - 1.0);
        state.emitter.vel = Vec2::new(2.0, 2.0);

        update(&mut state, &config, Action::Stay);
        assert!(state.emitter.vel.y < 0.0);
    }

    #[test]
    fn speed_burst_on_multiple_of_ten_score() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        state.emitter.pos = Vec2::new(200.0, 100.0);
        state.emitter.vel = Vec2::new(2.0, 2.0);

        // score 0: burst applies
        let before = state.emitter.pos;
        update(&mut state, &config, Action::Stay);
        assert_eq!(state.emitter.pos - before, Vec2::new(2.0, 2.0) * SPEED_MULT);

        // score 3: plain velocity
        state.score = 3;
        state.emitter.pos = Vec2::new(200.0, 100.0);
        state.emitter.vel = Vec2::new(2.0, 2.0);
        let before = state.emitter.pos;
        update(&mut state, &config, Action::Stay);
        assert_eq!(state.emitter.pos - before, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn catch_scores_and_pulses() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        // Directly over the player, one step above contact
        let drop_x = state.player.x + 10.0;
        inject_object(
            &mut state,
            drop_x,
            config.player_y - config.object_height - config.object_speed + 1.0,
        );

        update(&mut state, &config, Action::Stay);

        assert_eq!(state.score, 1);
        assert!(state.temp_collision_det);
        // The caught object is gone; a same-tick random spawn would still be
        // far above the player row.
        assert!(state.falling_objects.iter().all(|o| o.pos.y < 500.0));
        assert!(state.running);
    }

    #[test]
    fn pulse_lasts_one_tick() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        let drop_x = state.player.x;
        inject_object(&mut state, drop_x, config.player_y - 20.0);
        update(&mut state, &config, Action::Stay);
        assert!(state.temp_collision_det);

        update(&mut state, &config, Action::Stay);
        assert!(!state.temp_collision_det);
    }

    #[test]
    fn floor_crossing_ends_the_run_exactly_once() {
        let config = test_config();
        let mut state = GameState::new(&config, 1);
        // Far from the player so it can never be caught
        inject_object(&mut state, 5.0, config.floor_y() - config.object_speed);

        update(&mut state, &config, Action::Stay);
        assert!(!state.running);
        let score_at_end = state.score;

        // Contract violation territory for the adapter, but the core stays
        // total: further ticks must not resurrect the run or move the score.
        update(&mut state, &config, Action::Stay);
        assert!(!state.running);
        assert_eq!(state.score, score_at_end);
    }

    #[test]
    fn same_tick_floor_and_overlap_resolves_as_catch() {
        // Geometry where the player row touches the floor line, so one step
        // can cross both thresholds. The object must be removed and scored
        // even though the run ends.
        let config = GameConfig {
            player_y: 680.0,
            ..GameConfig::default()
        };
        assert!(config.player_y + config.player_height > config.floor_y());
        let mut state = GameState::new(&config, 1);
        let drop_x = state.player.x + 10.0;
        inject_object(
            &mut state,
            drop_x,
            config.floor_y() - config.object_speed + 1.0,
        );

        update(&mut state, &config, Action::Stay);

        assert_eq!(state.score, 1);
        assert!(state.temp_collision_det);
        assert!(state.falling_objects.iter().all(|o| o.pos.y < 500.0));
        assert!(!state.running);
    }

    #[test]
    fn spawned_objects_appear_at_the_drop_point() {
        let config = GameConfig {
            // 1-in-1 odds would need a zero range; Hard's 1-in-40 with many
            // ticks is deterministic enough under a fixed seed.
            difficulty: crate::settings::Difficulty::Hard,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&config, 99);
        let mut spawned = None;
        for _ in 0..2000 {
            let drop = state.emitter.drop_point(&config);
            let before = state.falling_objects.len();
            update(&mut state, &config, Action::Stay);
            if state.falling_objects.len() > before {
                // The emitter moved this tick before dropping
                let got = state.falling_objects.last().copied();
                spawned = got.map(|o| (o, drop));
                break;
            }
            if !state.running {
                break;
            }
        }
        let (obj, drop_before) = spawned.expect("no spawn in 2000 ticks");
        // Spawn x tracks the emitter within one tick of movement
        assert!((obj.pos.x - drop_before.x).abs() <= 4.0 * SPEED_MULT);
        assert!(obj.pos.y > 0.0);
    }

    proptest! {
        /// Clamp and cap invariants hold under arbitrary action sequences.
        #[test]
        fn invariants_under_random_play(
            seed in any::<u64>(),
            actions in prop::collection::vec(0u8..3, 1..400),
        ) {
            let config = test_config();
            let mut state = GameState::new(&config, seed);
            for index in actions {
                if !state.running {
                    break;
                }
                let action = Action::from_index(index).unwrap();
                update(&mut state, &config, action);
                prop_assert!(state.player.x >= config.player_min_x());
                prop_assert!(state.player.x <= config.player_max_x());
                prop_assert!(state.falling_objects.len() <= config.max_projectiles);
            }
        }

        /// Same seed and same actions give the same trajectory.
        #[test]
        fn deterministic_replay(seed in any::<u64>()) {
            let config = test_config();
            let mut a = GameState::new(&config, seed);
            let mut b = GameState::new(&config, seed);
            for i in 0..300u32 {
                if !a.running {
                    break;
                }
                let action = Action::from_index((i % 3) as u8).unwrap();
                update(&mut a, &config, action);
                update(&mut b, &config, action);
                prop_assert_eq!(a.player.x, b.player.x);
                prop_assert_eq!(a.emitter.pos, b.emitter.pos);
                prop_assert_eq!(a.falling_objects.len(), b.falling_objects.len());
                prop_assert_eq!(a.score, b.score);
            }
        }
    }
}
