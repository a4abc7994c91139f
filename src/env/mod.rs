//! Environment adapter for policy training
//!
//! Translates core game state into a fixed-shape observation and a scalar
//! reward, decoupled from rendering and real-time pacing. The interface
//! follows the Gym convention: `reset` starts an episode, `step` advances it
//! one tick and reports `(observation, reward, done, truncated, info)`.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catch;
pub mod observation;
pub mod reward;

pub use catch::CatchEnv;
pub use observation::Observation;
pub use reward::{CATCH_REWARD, RewardShaper};

/// Core trait for RL environments
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Start a new episode and return the initial observation. A `Some`
    /// seed reseeds the underlying RNG for a reproducible episode; `None`
    /// continues the existing stream.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Observation, EnvInfo), EnvError>;

    /// Advance the episode by one action.
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>, EnvError>;

    /// Shape of the observation space
    fn observation_space(&self) -> SpaceInfo;

    /// Shape of the action space
    fn action_space(&self) -> SpaceInfo;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode ended this tick
    pub done: bool,

    /// Time-limit truncation; this design has none, so always false
    pub truncated: bool,

    /// Pass-through telemetry
    pub info: EnvInfo,
}

/// Space information for observations and actions
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,
}

/// Telemetry returned alongside every observation. Pass-through fields for
/// external logging, not behavior.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvInfo {
    /// Cumulative score of the current episode
    pub score: u32,
    /// Episodes started since this adapter was built
    pub episode_num: u32,
    /// Downward object speed (difficulty telemetry)
    pub object_speed: f32,
    /// Active-object cap (difficulty telemetry)
    pub object_count: usize,
}

/// Caller contract violations, rejected explicitly rather than clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvError {
    /// Action index outside `{0, 1, 2}`.
    InvalidAction {
        /// The rejected wire value.
        index: u8,
    },
    /// `step` called after `done` without an intervening `reset`.
    EpisodeOver,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidAction { index } => {
                write!(f, "invalid action index {index} (expected 0, 1, or 2)")
            }
            EnvError::EpisodeOver => {
                write!(f, "step called on a finished episode; call reset first")
            }
        }
    }
}

impl Error for EnvError {}
