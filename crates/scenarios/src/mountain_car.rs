//! Under-powered car in a valley.
//!
//! The engine is too weak to climb the right-hand hill directly, so the
//! agent has to rock back and forth to build momentum. Position and
//! velocity are clipped to their declared bounds inside `step`; running
//! into the left wall stops the car dead.

use engine::{
    first_action, Action, ActionKind, ActionSpace, Config, Environment, EpisodeClock, Info,
    Observation, ObservationSpace, Phase, Resettable, Result, Scenario, SpaceAware,
    SpaceDefinition, Steppable, StepResult,
};
use tracing::debug;

use crate::common::{base_info, max_steps, uniform};

pub const NAME: &str = "mountaincar";
const DESCRIPTION: &str =
    "Classic MountainCar control environment - get the car to the top of the right hill";
const DEFAULT_MAX_STEPS: u32 = 200;

#[derive(Clone, Debug, PartialEq)]
pub struct MountainCarParams {
    pub min_position: f64,
    pub max_position: f64,
    pub max_speed: f64,
    pub goal_position: f64,
    pub force: f64,
    pub gravity: f64,
}

impl Default for MountainCarParams {
    fn default() -> Self {
        Self {
            min_position: -1.2,
            max_position: 0.6,
            max_speed: 0.07,
            goal_position: 0.5,
            force: 0.001,
            gravity: 0.0025,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MountainCarState {
    pub position: f64,
    pub velocity: f64,
}

pub struct MountainCarEnv {
    params: MountainCarParams,
    state: MountainCarState,
    clock: EpisodeClock,
    rng: fastrand::Rng,
}

impl MountainCarEnv {
    /// Integers are the discrete choice itself (0 left, 1 coast, 2 right);
    /// floats are bucketed into thirds of `[0, 1]`.
    pub const ACCEPTS: &'static [ActionKind] = &[ActionKind::Int, ActionKind::Float];

    #[must_use]
    pub fn new(max_steps: u32, seed: u64) -> Self {
        Self::with_params(MountainCarParams::default(), max_steps, seed)
    }

    #[must_use]
    pub fn with_params(params: MountainCarParams, max_steps: u32, seed: u64) -> Self {
        Self {
            params,
            state: MountainCarState::default(),
            clock: EpisodeClock::new(max_steps),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn params(&self) -> &MountainCarParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> MountainCarState {
        self.state
    }

    pub fn set_state(&mut self, state: MountainCarState) {
        self.state = state;
    }

    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.state.position >= self.params.goal_position
    }

    /// Discrete choice in `0..=2` for floats; integers pass through
    /// unchecked and are applied as given.
    fn decode(action: &Action) -> Result<i64> {
        action.expect_kind(NAME, Self::ACCEPTS)?;
        match action {
            Action::Int(choice) => Ok(*choice),
            other => {
                let value = other.as_f64()?;
                Ok(if value < 0.33 {
                    0
                } else if value < 0.67 {
                    1
                } else {
                    2
                })
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn apply(&mut self, choice: i64) {
        let p = &self.params;
        let s = &mut self.state;

        s.velocity += (choice as f64 - 1.0) * p.force + (3.0 * s.position).cos() * (-p.gravity);
        s.velocity = s.velocity.clamp(-p.max_speed, p.max_speed);

        s.position += s.velocity;
        if s.position <= p.min_position {
            s.position = p.min_position;
            s.velocity = 0.0;
        } else if s.position > p.max_position {
            s.position = p.max_position;
        }
    }

    fn observation(&self) -> Observation {
        let s = self.state;
        Observation::new(vec![s.position, s.velocity])
            .with("position", s.position)
            .with("velocity", s.velocity)
            .with("step", self.clock.step())
            .with("max_steps", self.clock.max_steps())
            .with("goal_reached", self.goal_reached())
    }
}

impl Resettable for MountainCarEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>> {
        self.clock.begin_episode()?;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        self.state = MountainCarState {
            position: uniform(&self.rng, -1.2, -0.6),
            velocity: 0.0,
        };
        debug!("mountaincar reset: {:?}", self.state);
        Ok(vec![self.observation()])
    }
}

impl Steppable for MountainCarEnv {
    fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.clock.ensure_open()?;
        let action = first_action(actions)?;
        let step = self.clock.tick()?;
        let choice = Self::decode(action)?;

        self.apply(choice);

        let goal = self.goal_reached();
        let done = goal || self.clock.exhausted();
        let reward = if goal { 0.0 } else { -1.0 };
        self.clock.finish(done);
        if goal {
            debug!("mountaincar reached the goal at step {step}");
        }

        Ok(StepResult::single(self.observation(), reward, done))
    }
}

impl SpaceAware for MountainCarEnv {
    fn spaces(&self) -> SpaceDefinition {
        spaces(&self.params)
    }
}

impl Environment for MountainCarEnv {
    fn info(&self) -> Info {
        let p = &self.params;
        let mut info = base_info(NAME, DESCRIPTION, &self.clock);
        info.insert("min_position".into(), p.min_position.into());
        info.insert("max_position".into(), p.max_position.into());
        info.insert("max_speed".into(), p.max_speed.into());
        info.insert("goal_position".into(), p.goal_position.into());
        info.insert("force".into(), p.force.into());
        info.insert("gravity".into(), p.gravity.into());
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

fn spaces(params: &MountainCarParams) -> SpaceDefinition {
    SpaceDefinition {
        action_space: ActionSpace::discrete(3),
        observation_space: ObservationSpace::boxed(
            vec![params.min_position, -params.max_speed],
            vec![params.max_position, params.max_speed],
        ),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MountainCarScenario;

impl MountainCarScenario {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for MountainCarScenario {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn spaces(&self) -> SpaceDefinition {
        spaces(&MountainCarParams::default())
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        max_steps(config, DEFAULT_MAX_STEPS, u32::MAX).map(|_| ())
    }

    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let max_steps = max_steps(config, DEFAULT_MAX_STEPS, u32::MAX)?;
        Ok(Box::new(MountainCarEnv::new(max_steps, seed)))
    }
}
