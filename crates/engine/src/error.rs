use thiserror::Error;

use crate::action::ActionKind;

/// Errors surfaced by the registry, scenarios and environments.
///
/// Every variant is returned synchronously; nothing here is retried.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("config validation failed: {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
    #[error("invalid config for scenario '{scenario}': {source}")]
    InvalidScenarioConfig {
        scenario: String,
        #[source]
        source: Box<SimError>,
    },
    #[error("scenario '{0}' not found")]
    ScenarioNotFound(String),
    #[error("scenario '{scenario}' does not accept {kind} actions")]
    UnsupportedActionType {
        scenario: &'static str,
        kind: ActionKind,
    },
    #[error("cannot convert {from} to {to}")]
    TypeConversion { from: ActionKind, to: &'static str },
    #[error("failed to construct environment: {0}")]
    EnvironmentConstruction(String),
    #[error("no actions provided")]
    NoActions,
    #[error("action payload is empty")]
    EmptyAction,
    #[error("environment is closed")]
    Closed,
    #[error("environment '{0}' not found")]
    EnvironmentNotFound(String),
}

impl SimError {
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::ConfigInvalid {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// True for plain config failures and for the scenario-wrapped form.
    #[must_use]
    pub fn is_config_invalid(&self) -> bool {
        matches!(
            self,
            SimError::ConfigInvalid { .. } | SimError::InvalidScenarioConfig { .. }
        )
    }
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
