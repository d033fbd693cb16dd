#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # rlenv: Reinforcement-Learning Environment Engine
//!
//! Reusable, steppable control simulators for reinforcement-learning
//! agents.
//!
//! ## Overview
//!
//! An agent picks a scenario by name, builds an environment from a flat
//! configuration, then drives it with `reset` and `step`. Every step
//! advances the simulation by one fixed time increment and returns
//! observations, rewards and termination flags. The engine itself is
//! transport-agnostic: anything that can route calls by environment id can
//! sit on top of [`EnvironmentTable`].
//!
//! ## Project Architecture
//!
//! -   **`rlenv`:** The crate you are currently viewing. It owns the
//!     environment session table, the episode runner and the command-line
//!     front end.
//! -   **[`engine`]:** Action and observation encoding, configuration,
//!     space definitions, the environment lifecycle traits and the scenario
//!     registry.
//! -   **[`scenarios`]:** The built-in physics environments: cart-pole,
//!     pendulum, mountain-car, lunar-lander and a scalar-tracking test
//!     scenario.
//!
//! ## Command Line
//!
//! ```text
//! rlenv list
//! rlenv spaces pendulum
//! rlenv info lunarlander
//! rlenv run cartpole --episodes 5 --policy random --seed 7 --set max_steps=200
//! ```
//!
//! Set `RUST_LOG=debug` to see per-episode and per-reset detail.

pub mod app;
pub mod session;

pub use engine;
pub use scenarios;

pub use app::{run_episodes, run_scenario, sample_action, EpisodeSummary, Policy, RunOptions};
pub use session::EnvironmentTable;
