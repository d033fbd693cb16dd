//! # Scenario Registry
//!
//! [`SimulationEngine`] maps scenario names to shared [`Scenario`]
//! factories. It is an ordinary value: build one at startup, register the
//! scenarios you want, and pass it by reference (or in an `Arc`) to
//! whatever needs to create environments.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::env::Environment;
use crate::error::{Result, SimError};
use crate::scenario::Scenario;

#[derive(Default)]
pub struct SimulationEngine {
    scenarios: HashMap<String, Arc<dyn Scenario>>,
}

impl SimulationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `scenario` under its name.
    ///
    /// A scenario already registered under the same name is replaced and
    /// returned. The overwrite is logged but not refused.
    pub fn register_scenario<S: Scenario + 'static>(&mut self, scenario: S) -> Option<Arc<dyn Scenario>> {
        self.register_shared(Arc::new(scenario))
    }

    pub fn register_shared(&mut self, scenario: Arc<dyn Scenario>) -> Option<Arc<dyn Scenario>> {
        let name = scenario.name().to_owned();
        let previous = self.scenarios.insert(name.clone(), scenario);
        if previous.is_some() {
            warn!("Scenario '{name}' was already registered; replacing it.");
        } else {
            info!("Registered scenario '{name}'.");
        }
        previous
    }

    /// # Errors
    ///
    /// Returns [`SimError::ScenarioNotFound`] when nothing is registered
    /// under `name`.
    pub fn get_scenario(&self, name: &str) -> Result<Arc<dyn Scenario>> {
        self.scenarios
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::ScenarioNotFound(name.to_owned()))
    }

    /// Registered names, in no particular order.
    #[must_use]
    pub fn list_scenarios(&self) -> Vec<String> {
        self.scenarios.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.scenarios.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Look up `name`, validate `config` against it, then build an
    /// environment. A `seed` entry in `config` takes precedence over the
    /// `seed` argument.
    ///
    /// Nothing is constructed when validation fails.
    ///
    /// # Errors
    ///
    /// [`SimError::ScenarioNotFound`], [`SimError::InvalidScenarioConfig`]
    /// wrapping the validation failure, or whatever the scenario's
    /// constructor returns.
    pub fn create_environment(&self, name: &str, config: &Config, seed: u64) -> Result<Box<dyn Environment>> {
        let scenario = self.get_scenario(name)?;

        let wrap = |source: SimError| SimError::InvalidScenarioConfig {
            scenario: name.to_owned(),
            source: Box::new(source),
        };
        scenario.validate_config(config).map_err(wrap)?;
        let seed = config.seed().map_err(wrap)?.unwrap_or(seed);

        debug!("Creating '{name}' environment with seed {seed}.");
        scenario.create_environment(config, seed)
    }
}
