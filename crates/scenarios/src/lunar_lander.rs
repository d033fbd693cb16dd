//! Simplified lunar lander.
//!
//! A point-mass lander falls under lunar gravity. Each step the agent may
//! fire one of three engines: the main engine thrusts along the lander's
//! axis, the side engines nudge it sideways and spin it. Touching down on
//! the pad slowly and upright is a landing; touching down anywhere else,
//! too fast or tilted, or leaving the arena, is a crash.

use engine::{
    first_action, Action, ActionKind, ActionSpace, Config, Environment, EpisodeClock, Info,
    Observation, ObservationSpace, Phase, Resettable, Result, Scenario, SpaceAware,
    SpaceDefinition, Steppable, StepResult,
};
use std::f64::consts::PI;
use tracing::debug;

use crate::common::{base_info, euler, max_steps, uniform};

pub const NAME: &str = "lunarlander";
const DESCRIPTION: &str =
    "Classic LunarLander control environment - land the spacecraft on the landing pad";
const DEFAULT_MAX_STEPS: u32 = 400;

#[derive(Clone, Debug, PartialEq)]
pub struct LunarLanderParams {
    pub gravity: f64,
    pub main_power: f64,
    pub lateral_power: f64,
    /// Angular velocity change per side-engine firing.
    pub side_spin: f64,
    pub dt: f64,
    pub pad_x: f64,
    pub pad_y: f64,
    pub pad_width: f64,
    /// Leaving `|x| > arena_half_width` or `y > arena_height` is a crash.
    pub arena_half_width: f64,
    pub arena_height: f64,
    pub safe_speed: f64,
    pub safe_angle: f64,
    pub side_fuel_cost: f64,
    pub main_fuel_cost: f64,
}

impl Default for LunarLanderParams {
    fn default() -> Self {
        Self {
            gravity: 1.6,
            main_power: 13.0,
            lateral_power: 0.6,
            side_spin: 0.1,
            dt: 1.0 / 60.0,
            pad_x: 0.0,
            pad_y: 0.0,
            pad_width: 0.3,
            arena_half_width: 3.0,
            arena_height: 3.0,
            safe_speed: 0.5,
            safe_angle: 0.3,
            side_fuel_cost: 0.03,
            main_fuel_cost: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thruster {
    Noop,
    Left,
    Main,
    Right,
}

impl Thruster {
    /// Out-of-range indices fall back to `Noop`.
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Thruster::Left,
            2 => Thruster::Main,
            3 => Thruster::Right,
            _ => Thruster::Noop,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LunarLanderState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub angular_v: f64,
}

pub struct LunarLanderEnv {
    params: LunarLanderParams,
    state: LunarLanderState,
    crashed: bool,
    landed: bool,
    clock: EpisodeClock,
    rng: fastrand::Rng,
}

impl LunarLanderEnv {
    /// Thruster index as an integer, or a float truncated toward zero.
    pub const ACCEPTS: &'static [ActionKind] = &[ActionKind::Int, ActionKind::Float];

    #[must_use]
    pub fn new(max_steps: u32, seed: u64) -> Self {
        Self::with_params(LunarLanderParams::default(), max_steps, seed)
    }

    #[must_use]
    pub fn with_params(params: LunarLanderParams, max_steps: u32, seed: u64) -> Self {
        Self {
            params,
            state: LunarLanderState::default(),
            crashed: false,
            landed: false,
            clock: EpisodeClock::new(max_steps),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn params(&self) -> &LunarLanderParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> LunarLanderState {
        self.state
    }

    pub fn set_state(&mut self, state: LunarLanderState) {
        self.state = state;
    }

    #[must_use]
    pub fn crashed(&self) -> bool {
        self.crashed
    }

    #[must_use]
    pub fn landed(&self) -> bool {
        self.landed
    }

    fn decode(action: &Action) -> Result<Thruster> {
        action.expect_kind(NAME, Self::ACCEPTS)?;
        Ok(Thruster::from_index(action.as_i64()?))
    }

    fn apply(&mut self, thruster: Thruster) {
        let p = &self.params;
        let s = &mut self.state;

        s.vy -= p.gravity * p.dt;
        match thruster {
            Thruster::Noop => {}
            Thruster::Left => {
                s.vx -= p.lateral_power * p.dt;
                s.angular_v += p.side_spin;
            }
            Thruster::Main => {
                s.vy += p.main_power * s.angle.cos() * p.dt;
                s.vx += p.main_power * s.angle.sin() * p.dt;
            }
            Thruster::Right => {
                s.vx += p.lateral_power * p.dt;
                s.angular_v -= p.side_spin;
            }
        }

        s.x = euler(s.x, s.vx, p.dt);
        s.y = euler(s.y, s.vy, p.dt);
        s.angle = euler(s.angle, s.angular_v, p.dt);
        if s.angle > PI {
            s.angle -= 2.0 * PI;
        } else if s.angle < -PI {
            s.angle += 2.0 * PI;
        }
    }

    /// Settle landing or crash from the post-step state. Flags stay set
    /// until the next reset.
    fn judge(&mut self) {
        let p = &self.params;
        let s = &self.state;
        if s.y <= p.pad_y {
            let on_pad = (s.x - p.pad_x).abs() <= p.pad_width / 2.0;
            let gentle = s.vx.abs() < p.safe_speed && s.vy.abs() < p.safe_speed;
            let upright = s.angle.abs() < p.safe_angle;
            if on_pad && gentle && upright {
                self.landed = true;
            } else {
                self.crashed = true;
            }
        }
        if s.x.abs() > p.arena_half_width || s.y > p.arena_height {
            self.crashed = true;
        }
    }

    fn reward(&self, thruster: Thruster) -> f64 {
        let p = &self.params;
        let s = &self.state;

        let distance = (s.x - p.pad_x).hypot(s.y - p.pad_y);
        let mut reward = -0.3 * distance;
        reward -= 0.3 * (s.vx.abs() + s.vy.abs());
        reward -= 0.5 * s.angle.abs();
        reward -= match thruster {
            Thruster::Left | Thruster::Right => p.side_fuel_cost,
            Thruster::Main => p.main_fuel_cost,
            Thruster::Noop => 0.0,
        };

        if self.landed {
            reward += 100.0;
        } else if self.crashed {
            reward -= 100.0;
        }
        reward
    }

    fn observation(&self) -> Observation {
        let s = self.state;
        // Leg contacts are not simulated and always read zero.
        Observation::new(vec![s.x, s.y, s.vx, s.vy, s.angle, s.angular_v, 0.0, 0.0])
            .with("x", s.x)
            .with("y", s.y)
            .with("vx", s.vx)
            .with("vy", s.vy)
            .with("angle", s.angle)
            .with("angular_v", s.angular_v)
            .with("step", self.clock.step())
            .with("max_steps", self.clock.max_steps())
            .with("crashed", self.crashed)
            .with("landed", self.landed)
    }
}

impl Resettable for LunarLanderEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>> {
        self.clock.begin_episode()?;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        self.state = LunarLanderState {
            x: uniform(&self.rng, -1.0, 1.0),
            y: uniform(&self.rng, 1.5, 2.0),
            vx: uniform(&self.rng, -0.2, 0.2),
            vy: uniform(&self.rng, -0.2, 0.2),
            angle: 0.0,
            angular_v: 0.0,
        };
        self.crashed = false;
        self.landed = false;
        debug!("lunarlander reset: {:?}", self.state);
        Ok(vec![self.observation()])
    }
}

impl Steppable for LunarLanderEnv {
    fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.clock.ensure_open()?;
        let action = first_action(actions)?;
        let step = self.clock.tick()?;
        let thruster = Self::decode(action)?;

        self.apply(thruster);
        self.judge();
        let reward = self.reward(thruster);

        let done = self.crashed || self.landed || self.clock.exhausted();
        self.clock.finish(done);
        if self.crashed || self.landed {
            debug!(
                "lunarlander episode ended at step {step} (landed: {}, crashed: {})",
                self.landed, self.crashed
            );
        }

        Ok(StepResult::single(self.observation(), reward, done))
    }
}

impl SpaceAware for LunarLanderEnv {
    fn spaces(&self) -> SpaceDefinition {
        spaces()
    }
}

impl Environment for LunarLanderEnv {
    fn info(&self) -> Info {
        let p = &self.params;
        let mut info = base_info(NAME, DESCRIPTION, &self.clock);
        info.insert("gravity".into(), p.gravity.into());
        info.insert("thrust_power".into(), p.main_power.into());
        info.insert("lateral_power".into(), p.lateral_power.into());
        info.insert("dt".into(), p.dt.into());
        info.insert("landing_pad_x".into(), p.pad_x.into());
        info.insert("landing_pad_y".into(), p.pad_y.into());
        info.insert("landing_pad_w".into(), p.pad_width.into());
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
        action_space: ActionSpace::discrete(4),
        observation_space: ObservationSpace::boxed(
            vec![-1.5, -5.0, -5.0, -5.0, -PI, -5.0, 0.0, 0.0],
            vec![1.5, 5.0, 5.0, 5.0, PI, 5.0, 1.0, 1.0],
        ),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LunarLanderScenario;

impl LunarLanderScenario {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for LunarLanderScenario {
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
        max_steps(config, DEFAULT_MAX_STEPS, u32::MAX).map(|_| ())
    }

    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let max_steps = max_steps(config, DEFAULT_MAX_STEPS, u32::MAX)?;
        Ok(Box::new(LunarLanderEnv::new(max_steps, seed)))
    }
}
