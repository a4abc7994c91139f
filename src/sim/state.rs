//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here. The RNG
//! handle itself is not serialized; a deserialized state is rebuilt from its
//! seed via [`GameState::reseed`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::settings::GameConfig;

/// The player's paddle: fixed size and row, mutable horizontal position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Left edge x, kept within `[pixel_buffer, screen_width - player_width - pixel_buffer]`
    pub x: f32,
}

impl Player {
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.x,
            config.player_y,
            config.player_width,
            config.player_height,
        )
    }
}

/// The emitter ("enemy") that bounces around the upper third of the field
/// and drops objects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Top-left corner
    pub pos: Vec2,
    /// Velocity in pixels per tick; sign flips on boundary contact
    pub vel: Vec2,
}

impl Emitter {
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            config.emitter_width,
            config.emitter_height,
        )
    }

    /// Bottom-center point where new falling objects appear
    pub fn drop_point(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(
            self.pos.x + config.emitter_width / 2.0,
            self.pos.y + config.emitter_height,
        )
    }
}

/// One falling object, moving straight down at constant speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    /// Top-left corner
    pub pos: Vec2,
}

impl FallingObject {
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            config.object_width,
            config.object_height,
        )
    }
}

/// Placeholder RNG for deserialized states; call [`GameState::reseed`] to
/// restore a deterministic stream.
fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state, advanced one tick at a time by [`super::tick::update`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving emitter velocity draws and spawn rolls
    #[serde(skip, default = "detached_rng")]
    pub rng: Pcg32,
    /// Player paddle
    pub player: Player,
    /// Object emitter
    pub emitter: Emitter,
    /// Active falling objects, insertion order; length never exceeds
    /// `config.max_projectiles`
    pub falling_objects: Vec<FallingObject>,
    /// Objects caught this run; monotone until restart
    pub score: u32,
    /// False once any object crosses the floor line
    pub running: bool,
    /// One-tick pulse set on the tick a catch occurred; consumed (and
    /// cleared) by the reward computation
    pub temp_collision_det: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a fresh game from a validated config and a seed.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let emitter = Emitter {
            pos: Self::emitter_start(config),
            vel: Self::draw_emitter_velocity(&mut rng),
        };
        Self {
            seed,
            rng,
            player: Player {
                x: config.player_start_x(),
            },
            emitter,
            falling_objects: Vec::with_capacity(config.max_projectiles),
            score: 0,
            running: true,
            temp_collision_det: false,
            time_ticks: 0,
        }
    }

    /// Reinitialize positions, velocity, score, and the object list for a new
    /// episode. The RNG stream continues across restarts; use [`reseed`]
    /// first for a reproducible episode.
    ///
    /// [`reseed`]: GameState::reseed
    pub fn restart(&mut self, config: &GameConfig) {
        self.player.x = config.player_start_x();
        self.emitter.pos = Self::emitter_start(config);
        self.emitter.vel = Self::draw_emitter_velocity(&mut self.rng);
        self.falling_objects.clear();
        self.score = 0;
        self.running = true;
        self.temp_collision_det = false;
    }

    /// Replace the RNG with a fresh stream for the given seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Emitter spawn position: horizontal center, one sixth down the field
    fn emitter_start(config: &GameConfig) -> Vec2 {
        Vec2::new(
            (config.screen_width - config.emitter_width) / 2.0,
            config.screen_height / 6.0 - config.emitter_height / 2.0,
        )
    }

    /// Draw a bounce velocity whose components never land in `{-1, 0, 1}`,
    /// so the emitter cannot stall on either axis.
    fn draw_emitter_velocity(rng: &mut Pcg32) -> Vec2 {
        use rand::Rng;
        let vx = EMITTER_SPEED_CHOICES_X[rng.random_range(0..EMITTER_SPEED_CHOICES_X.len())];
        let vy = EMITTER_SPEED_CHOICES_Y[rng.random_range(0..EMITTER_SPEED_CHOICES_Y.len())];
        Vec2::new(vx, vy)
    }

    // Read-only snapshot surface for a renderer: rectangles and score,
    // no mutation path.

    pub fn player_rect(&self, config: &GameConfig) -> Rect {
        self.player.rect(config)
    }

    pub fn emitter_rect(&self, config: &GameConfig) -> Rect {
        self.emitter.rect(config)
    }

    pub fn object_rects(&self, config: &GameConfig) -> Vec<Rect> {
        self.falling_objects
            .iter()
            .map(|obj| obj.rect(config))
            .collect()
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_centered_and_running() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 7);
        assert_eq!(state.player.x, config.player_start_x());
        assert!(state.running);
        assert_eq!(state.score, 0);
        assert!(state.falling_objects.is_empty());
        assert!(!state.temp_collision_det);
    }

    #[test]
    fn emitter_velocity_components_never_stall() {
        let config = GameConfig::default();
        for seed in 0..200 {
            let state = GameState::new(&config, seed);
            assert!(state.emitter.vel.x.abs() >= 2.0, "vx {}", state.emitter.vel.x);
            assert!(state.emitter.vel.y.abs() >= 2.0, "vy {}", state.emitter.vel.y);
        }
    }

    #[test]
    fn same_seed_same_velocity_draw() {
        let config = GameConfig::default();
        let a = GameState::new(&config, 42);
        let b = GameState::new(&config, 42);
        assert_eq!(a.emitter.vel, b.emitter.vel);
    }

    #[test]
    fn restart_clears_episode_state() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.player.x = 13.0;
        state.score = 9;
        state.running = false;
        state.temp_collision_det = true;
        state.falling_objects.push(FallingObject {
            pos: Vec2::new(100.0, 100.0),
        });

        state.restart(&config);

        assert_eq!(state.player.x, config.player_start_x());
        assert_eq!(state.score, 0);
        assert!(state.running);
        assert!(!state.temp_collision_det);
        assert!(state.falling_objects.is_empty());
    }

    #[test]
    fn reseed_restores_the_draw_sequence() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 5);
        let first = state.emitter.vel;
        state.restart(&config); // advances the stream
        state.reseed(5);
        state.restart(&config);
        assert_eq!(state.emitter.vel, first);
    }

    #[test]
    fn snapshot_rects_match_entity_geometry() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 0);
        let player = state.player_rect(&config);
        assert_eq!(player.y, config.player_y);
        assert_eq!(player.w, config.player_width);
        let emitter = state.emitter_rect(&config);
        assert_eq!(emitter.w, config.emitter_width);
        assert!(state.object_rects(&config).is_empty());
    }
}
