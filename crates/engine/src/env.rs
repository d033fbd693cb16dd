//! # Environment Contract
//!
//! Inspired by classic frameworks like OpenAI Gym, an environment is a
//! resettable, episode-based simulator. The contract is split into small
//! capability traits ([`Resettable`], [`Steppable`], [`SpaceAware`]) which
//! every concrete environment implements on its own state struct, and the
//! umbrella [`Environment`] trait that registries hand out as a trait
//! object.
//!
//! ## Lifecycle
//!
//! ```text
//! Initial --reset--> Ready --step--> Stepping --done--> Terminal
//!    |                 ^                |                  |
//!    |                 +------reset-----+------------------+
//!    +------------------------ close (any state) ------------> Closed
//! ```
//!
//! `reset` is legal from every state except `Closed` and always lands in
//! `Ready`. `close` is idempotent. Environments do no locking of their own;
//! callers serialise `reset`/`step` per instance.
//!
//! Rewards and termination flags are per-agent sequences. Every current
//! scenario has exactly one agent, so they always hold one element.

use serde::Serialize;

use crate::action::Action;
use crate::error::{Result, SimError};
use crate::observation::{Metadata, Observation};
use crate::spaces::SpaceDefinition;

/// Name, description and scenario constants reported by `info`.
pub type Info = Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initial,
    Ready,
    Stepping,
    Terminal,
    Closed,
}

/// Outcome of one `step`: one entry per agent in each sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub observations: Vec<Observation>,
    pub rewards: Vec<f64>,
    pub dones: Vec<bool>,
}

impl StepResult {
    /// Result for a single-agent environment.
    #[must_use]
    pub fn single(observation: Observation, reward: f64, done: bool) -> Self {
        Self {
            observations: vec![observation],
            rewards: vec![reward],
            dones: vec![done],
        }
    }

    /// True when any agent's episode ended.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.dones.iter().any(|&d| d)
    }

    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

pub trait Resettable {
    /// Re-randomise the state and zero the step counter.
    ///
    /// With `Some(seed)` the private random source is re-seeded first, so
    /// two environments reset with the same seed start identically.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Closed`] after `close`.
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<Observation>>;
}

pub trait Steppable {
    /// Advance the simulation by exactly one fixed time increment.
    ///
    /// Only the first action is read; extra actions are ignored.
    ///
    /// # Errors
    ///
    /// [`SimError::NoActions`] for an empty slice,
    /// [`SimError::UnsupportedActionType`] or [`SimError::TypeConversion`]
    /// when the action cannot be decoded, [`SimError::Closed`] after `close`.
    fn step(&mut self, actions: &[Action]) -> Result<StepResult>;
}

pub trait SpaceAware {
    fn spaces(&self) -> SpaceDefinition;
}

pub trait Environment: Resettable + Steppable + SpaceAware + Send {
    fn info(&self) -> Info;

    fn phase(&self) -> Phase;

    /// Current observation without advancing the simulation.
    fn observations(&self) -> Vec<Observation>;

    /// Release held resources. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// None of the built-in environments fail here; the `Result` is part of
    /// the contract for environments that own external resources.
    fn close(&mut self) -> Result<()>;
}

/// First action of a step call.
///
/// # Errors
///
/// Returns [`SimError::NoActions`] for an empty slice.
pub fn first_action(actions: &[Action]) -> Result<&Action> {
    actions.first().ok_or(SimError::NoActions)
}

/// Step counter and lifecycle phase shared by the concrete environments.
#[derive(Debug, Clone)]
pub struct EpisodeClock {
    step: u32,
    max_steps: u32,
    phase: Phase,
}

impl EpisodeClock {
    #[must_use]
    pub fn new(max_steps: u32) -> Self {
        Self {
            step: 0,
            max_steps,
            phase: Phase::Initial,
        }
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[must_use]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// # Errors
    ///
    /// Returns [`SimError::Closed`] once the environment is closed.
    pub fn ensure_open(&self) -> Result<()> {
        if self.phase == Phase::Closed {
            Err(SimError::Closed)
        } else {
            Ok(())
        }
    }

    /// # Errors
    ///
    /// Returns [`SimError::Closed`] once the environment is closed.
    pub fn begin_episode(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.step = 0;
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Consume one unit of the step budget and return the new count.
    ///
    /// Environments call this before decoding the action, so a step that
    /// later fails to decode still counts against `max_steps`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Closed`] once the environment is closed.
    pub fn tick(&mut self) -> Result<u32> {
        self.ensure_open()?;
        self.step = self.step.saturating_add(1);
        if self.phase != Phase::Terminal {
            self.phase = Phase::Stepping;
        }
        Ok(self.step)
    }

    pub fn finish(&mut self, done: bool) {
        if done && self.phase != Phase::Closed {
            self.phase = Phase::Terminal;
        }
    }

    /// Step budget exhausted.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.step >= self.max_steps
    }

    /// Returns `true` if this call did the closing.
    pub fn close(&mut self) -> bool {
        let was_open = self.phase != Phase::Closed;
        self.phase = Phase::Closed;
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_after_close_fails() {
        let mut clock = EpisodeClock::new(5);
        assert!(clock.close());
        assert!(!clock.close());
        assert!(matches!(clock.tick(), Err(SimError::Closed)));
    }

    #[test]
    fn terminal_phase_survives_extra_ticks() {
        let mut clock = EpisodeClock::new(1);
        clock.begin_episode().unwrap();
        clock.tick().unwrap();
        clock.finish(clock.exhausted());
        assert_eq!(clock.phase(), Phase::Terminal);
        clock.tick().unwrap();
        assert_eq!(clock.phase(), Phase::Terminal);
        assert_eq!(clock.step(), 2);
    }
}
