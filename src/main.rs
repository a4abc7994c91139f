//! Drop Catch entry point
//!
//! Headless rollout driver: runs independent environment instances on worker
//! threads, each playing episodes with a scripted greedy policy, and logs
//! aggregate results. It exercises exactly the `reset`/`step` contract an
//! external trainer would use; instances that fail to construct are skipped,
//! never fatal for the whole run.

use std::cmp::Ordering;
use std::thread;

use drop_catch::env::{CatchEnv, Environment, Observation};
use drop_catch::settings::GameConfig;
use drop_catch::sim::Action;

/// Number of independent environment instances
const NUM_ENVS: u64 = 4;
/// Episodes per instance
const EPISODES_PER_ENV: u32 = 25;
/// Driver-side stop for runaway episodes (the env itself never truncates)
const MAX_TICKS_PER_EPISODE: u32 = 200_000;

/// Steer the player's center under the lowest active object still above the
/// player row; hold position when no object qualifies.
fn greedy_action(obs: &Observation, config: &GameConfig) -> Action {
    let player_center = obs.player[0] + config.player_width / 2.0;
    let target = obs
        .projectiles
        .iter()
        .zip(&obs.mask)
        .filter(|&(_, &m)| m == 1)
        .map(|(pair, _)| pair)
        .filter(|pair| pair[1] < config.player_y)
        .max_by(|a, b| a[1].partial_cmp(&b[1]).unwrap_or(Ordering::Equal));

    match target {
        Some(pair) => {
            let object_center = pair[0] + config.object_width / 2.0;
            if (object_center - player_center).abs() <= config.player_speed / 2.0 {
                Action::Stay
            } else if object_center < player_center {
                Action::Left
            } else {
                Action::Right
            }
        }
        None => Action::Stay,
    }
}

#[derive(Debug, Clone, Copy)]
struct EpisodeStats {
    score: u32,
    episode_return: f32,
    ticks: u32,
}

/// Play all episodes for one environment instance.
fn run_instance(id: u64, config: GameConfig) -> Result<Vec<EpisodeStats>, String> {
    let mut env = CatchEnv::new(config.clone(), 1000 + id).map_err(|e| e.to_string())?;
    let mut stats = Vec::with_capacity(EPISODES_PER_ENV as usize);

    for episode in 0..EPISODES_PER_ENV {
        let (mut obs, _info) = env
            .reset(Some(id * 10_000 + u64::from(episode)))
            .map_err(|e| e.to_string())?;
        let mut episode_return = 0.0;
        let mut ticks = 0;
        let mut score = 0;

        loop {
            let action = greedy_action(&obs, &config);
            let result = env.step(action).map_err(|e| e.to_string())?;
            episode_return += result.reward;
            score = result.info.score;
            ticks += 1;
            obs = result.observation;

            if result.done || ticks >= MAX_TICKS_PER_EPISODE {
                break;
            }
        }

        log::debug!(
            "env {id} episode {episode}: score {score}, return {episode_return:.1}, {ticks} ticks"
        );
        stats.push(EpisodeStats {
            score,
            episode_return,
            ticks,
        });
    }

    Ok(stats)
}

/// Optional JSON config from the first CLI argument; default otherwise.
fn load_config() -> GameConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GameConfig::default();
    };
    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str::<GameConfig>(&json).map_err(|e| e.to_string()))
    {
        Ok(config) => {
            log::info!("loaded config from {path}");
            config
        }
        Err(e) => {
            log::warn!("could not load config from {path}: {e}; using defaults");
            GameConfig::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    log::info!(
        "running {NUM_ENVS} instances x {EPISODES_PER_ENV} episodes, difficulty {}",
        config.difficulty.as_str()
    );

    let handles: Vec<_> = (0..NUM_ENVS)
        .map(|id| {
            let config = config.clone();
            thread::spawn(move || run_instance(id, config))
        })
        .collect();

    let mut all = Vec::new();
    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(stats)) => all.extend(stats),
            Ok(Err(e)) => log::warn!("env {id} skipped: {e}"),
            Err(_) => log::warn!("env {id} worker panicked; skipped"),
        }
    }

    if all.is_empty() {
        log::error!("no environment instance produced results");
        return;
    }

    let episodes = all.len() as f32;
    let best_score = all.iter().map(|s| s.score).max().unwrap_or(0);
    let mean_return: f32 = all.iter().map(|s| s.episode_return).sum::<f32>() / episodes;
    let mean_ticks: f32 = all.iter().map(|s| s.ticks as f32).sum::<f32>() / episodes;

    log::info!(
        "{} episodes: best score {best_score}, mean return {mean_return:.1}, mean length {mean_ticks:.0} ticks",
        all.len()
    );
}
