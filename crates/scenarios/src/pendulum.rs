//! Inverted pendulum swing-up.
//!
//! A frictionless pendulum starts at a random angle; the agent applies a
//! bounded torque at the pivot to swing it upright and keep it there. The
//! episode never ends early: it always runs to `max_steps`.

use engine::{
    first_action, Action, ActionKind, ActionSpace, Config, Environment, EpisodeClock, Info,
    Observation, ObservationSpace, Phase, Resettable, Result, Scenario, SpaceAware,
    SpaceDefinition, Steppable, StepResult,
};
use std::f64::consts::PI;
use tracing::debug;

use crate::common::{angle_normalize, base_info, euler, max_steps, scalar, uniform};

pub const NAME: &str = "pendulum";
const DESCRIPTION: &str = "Classic Pendulum control environment - keep the pendulum upright";
const DEFAULT_MAX_STEPS: u32 = 200;

#[derive(Clone, Debug, PartialEq)]
pub struct PendulumParams {
    pub max_speed: f64,
    pub max_torque: f64,
    pub dt: f64,
    pub gravity: f64,
    pub mass: f64,
    pub length: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
        }
    }
}

impl PendulumParams {
    /// Quadratic cost of being at `state` while applying `torque`.
    #[must_use]
    pub fn cost(&self, state: &PendulumState, torque: f64) -> f64 {
        let theta = angle_normalize(state.theta);
        theta * theta + 0.1 * state.theta_dot * state.theta_dot + 0.001 * torque * torque
    }

    /// Semi-implicit Euler: the new angular velocity (clamped to
    /// `max_speed`) moves the angle.
    #[must_use]
    pub fn advance(&self, state: &PendulumState, torque: f64) -> PendulumState {
        let (g, m, l) = (self.gravity, self.mass, self.length);
        let theta_acc = 3.0 * g / (2.0 * l) * state.theta.sin() + 3.0 / (m * l * l) * torque;
        let theta_dot = euler(state.theta_dot, theta_acc, self.dt).clamp(-self.max_speed, self.max_speed);
        PendulumState {
            theta: euler(state.theta, theta_dot, self.dt),
            theta_dot,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendulumState {
    pub theta: f64,
    pub theta_dot: f64,
}

pub struct PendulumEnv {
    params: PendulumParams,
    state: PendulumState,
    clock: EpisodeClock,
    rng: fastrand::Rng,
}

impl PendulumEnv {
    /// Continuous torque as a scalar or a one-element sequence.
    pub const ACCEPTS: &'static [ActionKind] = &[
        ActionKind::Float,
        ActionKind::Int,
        ActionKind::FloatSeq,
        ActionKind::IntSeq,
    ];

    #[must_use]
    pub fn new(max_steps: u32, seed: u64) -> Self {
        Self::with_params(PendulumParams::default(), max_steps, seed)
    }

    #[must_use]
    pub fn with_params(params: PendulumParams, max_steps: u32, seed: u64) -> Self {
        Self {
            params,
            state: PendulumState::default(),
            clock: EpisodeClock::new(max_steps),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> PendulumState {
        self.state
    }

    pub fn set_state(&mut self, state: PendulumState) {
        self.state = state;
    }

    fn observation(&self) -> Observation {
        let s = self.state;
        Observation::new(vec![s.theta.cos(), s.theta.sin(), s.theta_dot])
            .with("theta", s.theta)
            .with("theta_dot", s.theta_dot)
            .with("step", self.clock.step())
            .with("max_steps", self.clock.max_steps())
    }
}

impl Resettable for PendulumEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>> {
        self.clock.begin_episode()?;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        self.state = PendulumState {
            theta: uniform(&self.rng, -PI, PI),
            theta_dot: uniform(&self.rng, -1.0, 1.0),
        };
        debug!("pendulum reset: {:?}", self.state);
        Ok(vec![self.observation()])
    }
}

impl Steppable for PendulumEnv {
    fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.clock.ensure_open()?;
        let action = first_action(actions)?;
        self.clock.tick()?;
        let max_torque = self.params.max_torque;
        let torque = scalar(action, NAME, Self::ACCEPTS)?.clamp(-max_torque, max_torque);

        let cost = self.params.cost(&self.state, torque);
        self.state = self.params.advance(&self.state, torque);

        let done = self.clock.exhausted();
        self.clock.finish(done);
        Ok(StepResult::single(self.observation(), -cost, done))
    }
}

impl SpaceAware for PendulumEnv {
    fn spaces(&self) -> SpaceDefinition {
        spaces(&self.params)
    }
}

impl Environment for PendulumEnv {
    fn info(&self) -> Info {
        let p = &self.params;
        let mut info = base_info(NAME, DESCRIPTION, &self.clock);
        info.insert("max_speed".into(), p.max_speed.into());
        info.insert("max_torque".into(), p.max_torque.into());
        info.insert("dt".into(), p.dt.into());
        info.insert("g".into(), p.gravity.into());
        info.insert("m".into(), p.mass.into());
        info.insert("l".into(), p.length.into());
        info
    }

    fn phase(&self) -> Phase {
        self.clock.phase()
    }

    fn observations(&self) -> Vec<Observation> {
        vec![self.observation()]
    }

    fn close(&mut self) -> Result<()> {
        self.clock.close();
        Ok(())
    }
}

fn spaces(params: &PendulumParams) -> SpaceDefinition {
    SpaceDefinition {
        action_space: ActionSpace::boxed(vec![-params.max_torque], vec![params.max_torque]),
        observation_space: ObservationSpace::boxed(
            vec![-1.0, -1.0, -params.max_speed],
            vec![1.0, 1.0, params.max_speed],
        ),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PendulumScenario;

impl PendulumScenario {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for PendulumScenario {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn spaces(&self) -> SpaceDefinition {
        spaces(&PendulumParams::default())
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        max_steps(config, DEFAULT_MAX_STEPS, u32::MAX).map(|_| ())
    }

    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let max_steps = max_steps(config, DEFAULT_MAX_STEPS, u32::MAX)?;
        Ok(Box::new(PendulumEnv::new(max_steps, seed)))
    }
}
