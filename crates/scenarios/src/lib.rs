#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Built-in Scenarios
//!
//! Five single-agent control problems implementing the
//! [`engine::Environment`] contract:
//!
//! | name          | actions              | observation |
//! |---------------|----------------------|-------------|
//! | `cartpole`    | discrete(2)          | 4           |
//! | `pendulum`    | box `[-2, 2]`        | 3           |
//! | `mountaincar` | discrete(3)          | 2           |
//! | `lunarlander` | discrete(4)          | 8           |
//! | `simple`      | box `[-10, 10]`      | 6           |
//!
//! Every environment advances by one fixed time increment per `step`
//! using explicit Euler integration and owns a seeded `fastrand::Rng`, so
//! a given seed replays the same episode.
//!
//! ```rust,ignore
//! let engine = scenarios::builtin_engine();
//! let mut env = engine.create_environment("pendulum", &Config::new(), 42)?;
//! env.reset(None)?;
//! env.step(&[Action::Float(0.5)])?;
//! ```

pub mod cartpole;
pub mod common;
pub mod lunar_lander;
pub mod mountain_car;
pub mod pendulum;
pub mod simple;

use engine::SimulationEngine;

pub use cartpole::{CartPoleEnv, CartPoleParams, CartPoleScenario, CartPoleState};
pub use lunar_lander::{
    LunarLanderEnv, LunarLanderParams, LunarLanderScenario, LunarLanderState, Thruster,
};
pub use mountain_car::{MountainCarEnv, MountainCarParams, MountainCarScenario, MountainCarState};
pub use pendulum::{PendulumEnv, PendulumParams, PendulumScenario, PendulumState};
pub use simple::{SimpleScenario, TrackingEnv, TrackingState};

/// Names of every scenario registered by [`register_builtin`].
pub const BUILTIN_SCENARIOS: [&str; 5] = [
    cartpole::NAME,
    pendulum::NAME,
    mountain_car::NAME,
    lunar_lander::NAME,
    simple::NAME,
];

/// Register all built-in scenarios into `engine`, replacing any scenario
/// already registered under the same names.
pub fn register_builtin(engine: &mut SimulationEngine) {
    engine.register_scenario(CartPoleScenario::new());
    engine.register_scenario(PendulumScenario::new());
    engine.register_scenario(MountainCarScenario::new());
    engine.register_scenario(LunarLanderScenario::new());
    engine.register_scenario(SimpleScenario::new());
}

/// A fresh engine with every built-in scenario registered.
#[must_use]
pub fn builtin_engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new();
    register_builtin(&mut engine);
    engine
}
