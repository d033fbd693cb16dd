//! CartPole environment for reinforcement learning
//!
//! A pole is hinged to a cart on a frictionless track. The agent pushes the
//! cart left or right with a fixed force and is rewarded for every step the
//! pole stays within twelve degrees of vertical and the cart stays on the
//! track. Dynamics follow the classic Barto, Sutton and Anderson equations,
//! integrated with one explicit Euler step per call.

use engine::{
    first_action, Action, ActionKind, ActionSpace, Config, Environment, EpisodeClock, Info,
    Observation, ObservationSpace, Phase, Resettable, Result, Scenario, SpaceAware,
    SpaceDefinition, Steppable, StepResult,
};
use tracing::debug;

use crate::common::{base_info, euler, max_steps, uniform};

pub const NAME: &str = "cartpole";
const DESCRIPTION: &str = "Classic CartPole control environment - balance a pole on a cart";
const DEFAULT_MAX_STEPS: u32 = 500;

/// Physical constants for a CartPole
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleParams {
    /// Gravitational acceleration (m/s^2)
    pub gravity: f64,
    /// Cart mass in kg
    pub cart_mass: f64,
    /// Pole mass in kg
    pub pole_mass: f64,
    /// Half the pole length in meters
    pub half_length: f64,
    /// Magnitude of the force applied to the cart
    pub force_mag: f64,
    /// Seconds between state updates
    pub tau: f64,
    /// Angle threshold for failure detection (radians)
    pub theta_threshold: f64,
    /// Position threshold for failure detection (meters)
    pub x_threshold: f64,
    /// Half-width of the initial state distribution
    pub init_range: f64,
}

impl Default for CartPoleParams {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            half_length: 0.5,
            force_mag: 10.0,
            tau: 0.02, // 50 updates per second
            theta_threshold: 12.0_f64.to_radians(),
            x_threshold: 2.4,
            init_range: 0.05,
        }
    }
}

impl CartPoleParams {
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.cart_mass + self.pole_mass
    }

    #[must_use]
    pub fn pole_mass_length(&self) -> f64 {
        self.pole_mass * self.half_length
    }

    /// Angular and linear acceleration `(theta_acc, x_acc)` under `force`.
    #[must_use]
    pub fn accelerations(&self, state: &CartPoleState, force: f64) -> (f64, f64) {
        let total_mass = self.total_mass();
        let pole_mass_length = self.pole_mass_length();
        let (sin_theta, cos_theta) = state.theta.sin_cos();

        let temp = (force + pole_mass_length * state.theta_dot * state.theta_dot * sin_theta) / total_mass;
        let theta_acc = (self.gravity * sin_theta - cos_theta * temp)
            / (self.half_length * (4.0 / 3.0 - self.pole_mass * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;
        (theta_acc, x_acc)
    }

    /// State after one Euler step of length `tau`.
    ///
    /// Positions advance with the pre-step velocities.
    #[must_use]
    pub fn advance(&self, state: &CartPoleState, force: f64) -> CartPoleState {
        let (theta_acc, x_acc) = self.accelerations(state, force);
        CartPoleState {
            x: euler(state.x, state.x_dot, self.tau),
            x_dot: euler(state.x_dot, x_acc, self.tau),
            theta: euler(state.theta, state.theta_dot, self.tau),
            theta_dot: euler(state.theta_dot, theta_acc, self.tau),
        }
    }
}

/// `[cart_x, cart_vel, pole_angle, pole_angular_vel]`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

pub struct CartPoleEnv {
    params: CartPoleParams,
    state: CartPoleState,
    clock: EpisodeClock,
    rng: fastrand::Rng,
}

impl CartPoleEnv {
    /// Float (`< 0.5` pushes left), integer (same rule after widening) and
    /// native two-valued bool (`true` pushes right).
    pub const ACCEPTS: &'static [ActionKind] = &[ActionKind::Float, ActionKind::Int, ActionKind::Bool];

    #[must_use]
    pub fn new(max_steps: u32, seed: u64) -> Self {
        Self::with_params(CartPoleParams::default(), max_steps, seed)
    }

    #[must_use]
    pub fn with_params(params: CartPoleParams, max_steps: u32, seed: u64) -> Self {
        Self {
            params,
            state: CartPoleState::default(),
            clock: EpisodeClock::new(max_steps),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn params(&self) -> &CartPoleParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> CartPoleState {
        self.state
    }

    pub fn set_state(&mut self, state: CartPoleState) {
        self.state = state;
    }

    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.clock.step()
    }

    /// Cart off the track or pole past the failure angle.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.state.x.abs() > self.params.x_threshold || self.state.theta.abs() > self.params.theta_threshold
    }

    fn decode_force(&self, action: &Action) -> Result<f64> {
        action.expect_kind(NAME, Self::ACCEPTS)?;
        let push_right = match action {
            Action::Bool(right) => *right,
            other => other.as_f64()? >= 0.5,
        };
        Ok(if push_right {
            self.params.force_mag
        } else {
            -self.params.force_mag
        })
    }

    fn observation(&self) -> Observation {
        let s = self.state;
        Observation::new(s.to_vec())
            .with("x", s.x)
            .with("x_dot", s.x_dot)
            .with("theta", s.theta)
            .with("theta_dot", s.theta_dot)
            .with("step", self.clock.step())
            .with("max_steps", self.clock.max_steps())
    }
}

impl Resettable for CartPoleEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>> {
        self.clock.begin_episode()?;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        let r = self.params.init_range;
        self.state = CartPoleState {
            x: uniform(&self.rng, -r, r),
            x_dot: uniform(&self.rng, -r, r),
            theta: uniform(&self.rng, -r, r),
            theta_dot: uniform(&self.rng, -r, r),
        };
        debug!("cartpole reset: {:?}", self.state);
        Ok(vec![self.observation()])
    }
}

impl Steppable for CartPoleEnv {
    fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.clock.ensure_open()?;
        let action = first_action(actions)?;
        let step = self.clock.tick()?;
        let force = self.decode_force(action)?;

        self.state = self.params.advance(&self.state, force);

        let failed = self.failed();
        let done = failed || self.clock.exhausted();
        // A failing step earns nothing; surviving to the budget still pays.
        let reward = if done && step < self.clock.max_steps() { 0.0 } else { 1.0 };
        self.clock.finish(done);
        if done {
            debug!("cartpole episode ended at step {step} (failed: {failed})");
        }

        Ok(StepResult::single(self.observation(), reward, done))
    }
}

impl SpaceAware for CartPoleEnv {
    fn spaces(&self) -> SpaceDefinition {
        spaces(&self.params)
    }
}

impl Environment for CartPoleEnv {
    fn info(&self) -> Info {
        let p = &self.params;
        let mut info = base_info(NAME, DESCRIPTION, &self.clock);
        info.insert("gravity".into(), p.gravity.into());
        info.insert("masscart".into(), p.cart_mass.into());
        info.insert("masspole".into(), p.pole_mass.into());
        info.insert("length".into(), p.half_length.into());
        info.insert("force_mag".into(), p.force_mag.into());
        info.insert("tau".into(), p.tau.into());
        info.insert("theta_threshold_radians".into(), p.theta_threshold.into());
        info.insert("x_threshold".into(), p.x_threshold.into());
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

fn spaces(params: &CartPoleParams) -> SpaceDefinition {
    let x = params.x_threshold * 2.0;
    let theta = params.theta_threshold * 2.0;
    SpaceDefinition {
        action_space: ActionSpace::discrete(2),
        observation_space: ObservationSpace::boxed(
            vec![-x, -f64::MAX, -theta, -f64::MAX],
            vec![x, f64::MAX, theta, f64::MAX],
        ),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CartPoleScenario;

impl CartPoleScenario {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for CartPoleScenario {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn spaces(&self) -> SpaceDefinition {
        spaces(&CartPoleParams::default())
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        max_steps(config, DEFAULT_MAX_STEPS, u32::MAX).map(|_| ())
    }

    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let max_steps = max_steps(config, DEFAULT_MAX_STEPS, u32::MAX)?;
        Ok(Box::new(CartPoleEnv::new(max_steps, seed)))
    }
}
