#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Environment Engine Core
//!
//! Shared vocabulary for steppable control simulators driven by
//! reinforcement-learning agents.
//!
//! ## Key Components
//!
//! -   **Actions and observations:** [`Action`] is a tagged payload with
//!     widening accessors; [`Observation`] is a fixed-length `f64` vector
//!     plus diagnostic metadata.
//! -   **Configuration:** [`Config`] is a flat, loosely typed key/value map
//!     that each scenario validates for itself.
//! -   **Spaces:** [`SpaceDefinition`] describes valid action and
//!     observation shapes and ranges.
//! -   **Environments:** the [`Environment`] trait and its capability
//!     traits define the reset/step/close lifecycle.
//! -   **Registry:** [`SimulationEngine`] maps scenario names to
//!     [`Scenario`] factories and builds environments from them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engine::{Action, Config, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new();
//! engine.register_scenario(MyScenario::new());
//!
//! let config = Config::new().with("max_steps", 200);
//! let mut env = engine.create_environment("my-scenario", &config, 7)?;
//! let obs = env.reset(None)?;
//! let result = env.step(&[Action::Float(0.3)])?;
//! env.close()?;
//! ```

pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod registry;
pub mod scenario;
pub mod spaces;

pub use action::{Action, ActionKind};
pub use config::{Config, ConfigValue, SEED_KEY};
pub use env::{
    first_action, Environment, EpisodeClock, Info, Phase, Resettable, SpaceAware, Steppable,
    StepResult,
};
pub use error::{Result, SimError};
pub use observation::{Metadata, Observation};
pub use registry::SimulationEngine;
pub use scenario::Scenario;
pub use spaces::{shape_size, ActionSpace, Dtype, ObservationSpace, SpaceDefinition, SpaceType};
