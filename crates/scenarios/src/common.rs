//! Helpers shared by the built-in scenarios: config parsing, action
//! decoding, explicit Euler updates and info maps.

use engine::{Action, ActionKind, Config, EpisodeClock, Info, Result, SimError};

pub const MAX_STEPS_KEY: &str = "max_steps";

/// One explicit Euler update: `x + dt * rate`.
#[inline]
#[must_use]
pub fn euler(x: f64, rate: f64, dt: f64) -> f64 {
    x + dt * rate
}

/// Sample uniformly from `[low, high)`.
#[inline]
#[must_use]
pub fn uniform(rng: &fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Wrap an angle into `[-pi, pi)`.
#[must_use]
pub fn angle_normalize(x: f64) -> f64 {
    use std::f64::consts::PI;
    (x + PI).rem_euclid(2.0 * PI) - PI
}

/// Read `max_steps`, falling back to `default` when absent.
///
/// Accepts a native integer or an integral string in `1..=upper`.
///
/// # Errors
///
/// Returns [`SimError::ConfigInvalid`] for non-integers and values outside
/// the range.
pub fn max_steps(config: &Config, default: u32, upper: u32) -> Result<u32> {
    let Some(steps) = config.get_i64(MAX_STEPS_KEY)? else {
        return Ok(default);
    };
    if steps <= 0 {
        return Err(SimError::config(
            MAX_STEPS_KEY,
            format!("must be positive, got {steps}"),
        ));
    }
    match u32::try_from(steps) {
        Ok(steps) if steps <= upper => Ok(steps),
        _ => Err(SimError::config(
            MAX_STEPS_KEY,
            format!("must be between 1 and {upper}, got {steps}"),
        )),
    }
}

/// Decode a scalar control signal.
///
/// Scalars go through the `f64` widening rule; a one-element numeric
/// sequence (how box-shaped actions usually arrive) yields its element.
///
/// # Errors
///
/// [`SimError::UnsupportedActionType`] for tags outside `accepted` or
/// sequences of any other length.
pub fn scalar(action: &Action, scenario: &'static str, accepted: &[ActionKind]) -> Result<f64> {
    action.expect_kind(scenario, accepted)?;
    match action {
        Action::FloatSeq(_) | Action::IntSeq(_) => match action.as_f64_vec()?.as_slice() {
            [value] => Ok(*value),
            _ => Err(SimError::UnsupportedActionType {
                scenario,
                kind: action.kind(),
            }),
        },
        _ => action.as_f64(),
    }
}

/// Name, description and step budget; scenarios append their constants.
#[must_use]
pub fn base_info(name: &str, description: &str, clock: &EpisodeClock) -> Info {
    let mut info = Info::new();
    info.insert("name".into(), name.into());
    info.insert("description".into(), description.into());
    info.insert("max_steps".into(), clock.max_steps().into());
    info.insert("current_step".into(), clock.step().into());
    info
}
