//! # Episode Runner
//!
//! Drives whole episodes against a single environment: reset, query the
//! policy, step until the episode ends or the per-episode cap is hit, and
//! report what happened. The CLI's `run` command is a thin wrapper over
//! [`run_scenario`]; tests and benchmarks call [`run_episodes`] with their
//! own policy closures.

use clap::ValueEnum;
use engine::{
    Action, ActionSpace, Config, Environment, Observation, Result, SimulationEngine, SpaceType,
};
use tracing::{debug, info};

/// Built-in action policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Zero, clamped into the action space (the low end for discrete spaces).
    Zero,
    /// Uniform sample from the action space.
    Random,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub steps: u32,
    pub total_reward: f64,
    /// `true` when the environment ended the episode, `false` when the
    /// per-episode cap cut it short.
    pub terminal: bool,
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub episodes: u32,
    /// Cap on steps per episode on top of the scenario's own `max_steps`.
    pub max_episode_steps: Option<u32>,
    pub seed: u64,
    pub policy: Policy,
    pub config: Config,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            episodes: 1,
            max_episode_steps: None,
            seed: 0,
            policy: Policy::Random,
            config: Config::new(),
        }
    }
}

/// Action the built-in `policy` picks in `space`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sample_action(space: &ActionSpace, policy: Policy, rng: &fastrand::Rng) -> Action {
    let bound = |values: &[f64], i: usize| values.get(i).or(values.first()).copied().unwrap_or(0.0);
    let size = space.size().max(1);

    match space.kind {
        SpaceType::Discrete => {
            let low = bound(&space.low, 0) as i64;
            let high = bound(&space.high, 0) as i64;
            match policy {
                Policy::Zero => Action::Int(low),
                Policy::Random => Action::Int(rng.i64(low..=high.max(low))),
            }
        }
        SpaceType::MultiBinary => Action::BoolSeq(
            (0..size)
                .map(|_| policy == Policy::Random && rng.bool())
                .collect(),
        ),
        SpaceType::MultiDiscrete => Action::IntSeq(
            (0..size)
                .map(|i| {
                    let low = bound(&space.low, i) as i64;
                    let high = bound(&space.high, i) as i64;
                    match policy {
                        Policy::Zero => low,
                        Policy::Random => rng.i64(low..=high.max(low)),
                    }
                })
                .collect(),
        ),
        SpaceType::Box => {
            let values: Vec<f64> = (0..size)
                .map(|i| {
                    let (low, high) = (bound(&space.low, i), bound(&space.high, i));
                    match policy {
                        Policy::Zero => 0.0_f64.clamp(low.min(high), high.max(low)),
                        Policy::Random => low + rng.f64() * (high - low),
                    }
                })
                .collect();
            match values.as_slice() {
                [value] => Action::Float(*value),
                _ => Action::FloatSeq(values),
            }
        }
    }
}

fn first(observations: Vec<Observation>) -> Observation {
    observations
        .into_iter()
        .next()
        .unwrap_or_else(|| Observation::new(Vec::new()))
}

/// Run `episodes` episodes on `env`, asking `policy` for each action.
///
/// Each episode starts with `reset(None)`, so a seeded environment replays
/// the same sequence of episodes.
///
/// # Errors
///
/// The first reset or step error ends the run and is returned.
pub fn run_episodes<F>(
    env: &mut dyn Environment,
    episodes: u32,
    max_episode_steps: Option<u32>,
    mut policy: F,
) -> Result<Vec<EpisodeSummary>>
where
    F: FnMut(&Observation) -> Action,
{
    let mut summaries = Vec::new();
    for episode in 0..episodes {
        let mut observation = first(env.reset(None)?);
        let mut summary = EpisodeSummary {
            episode,
            steps: 0,
            total_reward: 0.0,
            terminal: false,
        };

        while max_episode_steps.map_or(true, |cap| summary.steps < cap) {
            let action = policy(&observation);
            let result = env.step(&[action])?;
            summary.steps += 1;
            summary.total_reward += result.total_reward();
            if result.is_done() {
                summary.terminal = true;
                break;
            }
            observation = first(result.observations);
        }

        debug!("Episode {episode} finished: {summary:?}");
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Build `scenario` from `engine` and run it with a built-in policy.
///
/// The environment is closed before returning, on success and on error.
///
/// # Errors
///
/// Environment construction, reset and step errors.
pub fn run_scenario(
    engine: &SimulationEngine,
    scenario: &str,
    options: &RunOptions,
) -> Result<Vec<EpisodeSummary>> {
    let mut env = engine.create_environment(scenario, &options.config, options.seed)?;
    let space = env.spaces().action_space;
    let rng = fastrand::Rng::with_seed(options.seed);

    info!(
        "Running {} episode(s) of '{scenario}' with the {:?} policy (seed {}).",
        options.episodes, options.policy, options.seed
    );
    let outcome = run_episodes(
        &mut *env,
        options.episodes,
        options.max_episode_steps,
        |_| sample_action(&space, options.policy, &rng),
    );
    env.close()?;

    let summaries = outcome?;
    for summary in &summaries {
        info!(
            "Episode {}: {} steps, total reward {:.3}{}",
            summary.episode,
            summary.steps,
            summary.total_reward,
            if summary.terminal { "" } else { " (capped)" }
        );
    }
    Ok(summaries)
}
