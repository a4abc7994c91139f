//! The Catch environment adapter
//!
//! Owns one [`GameState`] plus its config and exposes the Gym-style
//! `reset`/`step` contract over it. Episode bookkeeping (`done`, movement
//! history, episode counter) lives here, never in the core.

use super::observation::Observation;
use super::reward::RewardShaper;
use super::{EnvError, EnvInfo, Environment, SpaceInfo, SpaceType, StepResult};
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{Action, GameState, update};

/// Gym-style environment over the catch game
#[derive(Debug, Clone)]
pub struct CatchEnv {
    config: GameConfig,
    game: GameState,
    shaper: RewardShaper,
    done: bool,
    episode_num: u32,
}

impl CatchEnv {
    /// Build an environment from a validated config and an RNG seed.
    ///
    /// No episode is active until the first [`reset`](Environment::reset);
    /// stepping before it is rejected like stepping a finished episode.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let game = GameState::new(&config, seed);
        let shaper = RewardShaper::new(&config);
        Ok(Self {
            config,
            game,
            shaper,
            done: true,
            episode_num: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only game state, e.g. for a renderer
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Episodes started so far
    pub fn episode_num(&self) -> u32 {
        self.episode_num
    }

    /// Decode a wire-encoded action and step. Out-of-range indices are
    /// rejected, not clamped.
    pub fn step_index(&mut self, index: u8) -> Result<StepResult<Observation>, EnvError> {
        let action = Action::from_index(index).ok_or(EnvError::InvalidAction { index })?;
        self.step(action)
    }

    fn info(&self) -> EnvInfo {
        EnvInfo {
            score: self.game.score,
            episode_num: self.episode_num,
            object_speed: self.config.object_speed,
            object_count: self.config.max_projectiles,
        }
    }
}

impl Environment for CatchEnv {
    type Observation = Observation;
    type Action = Action;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, EnvInfo), EnvError> {
        self.done = false;
        self.shaper.reset(&self.config);
        if let Some(seed) = seed {
            self.game.reseed(seed);
        }
        self.game.restart(&self.config);
        self.episode_num += 1;
        Ok((Observation::encode(&self.game, &self.config), self.info()))
    }

    fn step(&mut self, action: Action) -> Result<StepResult<Observation>, EnvError> {
        if self.done {
            return Err(EnvError::EpisodeOver);
        }

        update(&mut self.game, &self.config, action);
        if !self.game.running {
            self.done = true;
        }

        let observation = Observation::encode(&self.game, &self.config);

        // Consume the core's one-tick catch pulse
        let caught = self.game.temp_collision_det;
        if caught {
            self.game.temp_collision_det = false;
        }
        let reward = self.shaper.compute(&observation, &self.config, caught);

        Ok(StepResult {
            observation,
            reward,
            done: self.done,
            truncated: false,
            info: self.info(),
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![Observation::flat_len(self.config.max_projectiles)],
            dtype: SpaceType::Continuous,
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![],
            dtype: SpaceType::Discrete(3),
        }
    }
}
