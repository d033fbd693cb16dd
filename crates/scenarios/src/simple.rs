//! Scalar tracking: nudge a value until it matches a hidden target.
//!
//! Mostly useful for exercising clients and transports end to end; the
//! optimal policy is a single step of `target - current`.

use engine::{
    first_action, Action, ActionKind, ActionSpace, Config, Environment, EpisodeClock, Info,
    Observation, ObservationSpace, Phase, Resettable, Result, Scenario, SpaceAware,
    SpaceDefinition, Steppable, StepResult, SimError,
};
use tracing::debug;

use crate::common::{base_info, max_steps, scalar, uniform};

pub const NAME: &str = "simple";
pub const TOLERANCE_KEY: &str = "tolerance";
const DESCRIPTION: &str = "Simple mathematical test scenario for debugging and development";
const DEFAULT_MAX_STEPS: u32 = 100;
const MAX_STEPS_UPPER: u32 = 1000;
const DEFAULT_TOLERANCE: f64 = 0.1;
const MAX_TOLERANCE: f64 = 10.0;
const INITIAL_TARGET: f64 = 10.0;
const TARGET_RANGE: f64 = 10.0;
const SUCCESS_BONUS: f64 = 10.0;
const OBS_BOUND: f64 = 1_000_000.0;

fn tolerance(config: &Config) -> Result<f64> {
    let Some(tolerance) = config.get_f64(TOLERANCE_KEY)? else {
        return Ok(DEFAULT_TOLERANCE);
    };
    if tolerance > 0.0 && tolerance <= MAX_TOLERANCE {
        Ok(tolerance)
    } else {
        Err(SimError::config(
            TOLERANCE_KEY,
            format!("must be between 0 and {MAX_TOLERANCE}, got {tolerance}"),
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingState {
    pub current: f64,
    pub target: f64,
}

impl Default for TrackingState {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: INITIAL_TARGET,
        }
    }
}

impl TrackingState {
    #[must_use]
    pub fn distance(&self) -> f64 {
        (self.current - self.target).abs()
    }
}

pub struct TrackingEnv {
    state: TrackingState,
    tolerance: f64,
    clock: EpisodeClock,
    rng: fastrand::Rng,
}

impl TrackingEnv {
    pub const ACCEPTS: &'static [ActionKind] = &[
        ActionKind::Float,
        ActionKind::Int,
        ActionKind::FloatSeq,
        ActionKind::IntSeq,
    ];

    #[must_use]
    pub fn new(max_steps: u32, tolerance: f64, seed: u64) -> Self {
        Self {
            state: TrackingState::default(),
            tolerance,
            clock: EpisodeClock::new(max_steps),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn set_state(&mut self, state: TrackingState) {
        self.state = state;
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn within_tolerance(&self) -> bool {
        self.state.distance() < self.tolerance
    }

    fn observation(&self) -> Observation {
        let s = self.state;
        let step = f64::from(self.clock.step());
        let max_steps = f64::from(self.clock.max_steps());
        Observation::new(vec![
            s.current,
            s.target,
            s.target - s.current,
            step,
            max_steps,
            step / max_steps,
        ])
        .with("current_value", s.current)
        .with("target_value", s.target)
        .with("current_step", step)
        .with("max_steps", max_steps)
        .with("distance", s.distance())
    }
}

impl Resettable for TrackingEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>> {
        self.clock.begin_episode()?;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        self.state = TrackingState {
            current: 0.0,
            target: uniform(&self.rng, -TARGET_RANGE, TARGET_RANGE),
        };
        debug!("simple reset: target {:.3}", self.state.target);
        Ok(vec![self.observation()])
    }
}

impl Steppable for TrackingEnv {
    fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.clock.ensure_open()?;
        let action = first_action(actions)?;
        self.clock.tick()?;
        let delta = scalar(action, NAME, Self::ACCEPTS)?;

        self.state.current += delta;

        let hit = self.within_tolerance();
        let mut reward = -self.state.distance();
        if hit {
            reward += SUCCESS_BONUS;
        }
        let done = hit || self.clock.exhausted();
        self.clock.finish(done);

        Ok(StepResult::single(self.observation(), reward, done))
    }
}

impl SpaceAware for TrackingEnv {
    fn spaces(&self) -> SpaceDefinition {
        spaces()
    }
}

impl Environment for TrackingEnv {
    fn info(&self) -> Info {
        let mut info = base_info(NAME, DESCRIPTION, &self.clock);
        info.insert(TOLERANCE_KEY.into(), self.tolerance.into());
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

fn spaces() -> SpaceDefinition {
    SpaceDefinition {
        action_space: ActionSpace::boxed(vec![-TARGET_RANGE], vec![TARGET_RANGE]),
        observation_space: ObservationSpace::boxed(
            vec![-OBS_BOUND, -OBS_BOUND, 0.0, 0.0, 0.0, -OBS_BOUND],
            vec![OBS_BOUND; 6],
        ),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleScenario;

impl SimpleScenario {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for SimpleScenario {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn spaces(&self) -> SpaceDefinition {
        spaces()
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        max_steps(config, DEFAULT_MAX_STEPS, MAX_STEPS_UPPER)?;
        tolerance(config)?;
        Ok(())
    }

    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let max_steps = max_steps(config, DEFAULT_MAX_STEPS, MAX_STEPS_UPPER)?;
        let tolerance = tolerance(config)?;
        Ok(Box::new(TrackingEnv::new(max_steps, tolerance, seed)))
    }
}
