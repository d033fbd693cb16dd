//! # Environment Sessions
//!
//! Transport layers hand out opaque ids and route every call for an id to
//! the same live environment. [`EnvironmentTable`] owns those environments.
//!
//! The id map sits behind a table-level read/write lock that is only held
//! long enough to clone an entry out. Each environment then has its own
//! mutex, so calls for one id are serialised while different ids step in
//! parallel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use engine::{
    Action, Config, Environment, Info, Observation, Result, SimError, SimulationEngine,
    SpaceDefinition, StepResult,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

type Shared = Arc<Mutex<Box<dyn Environment>>>;

pub struct EnvironmentTable {
    engine: Arc<SimulationEngine>,
    envs: RwLock<HashMap<String, Shared>>,
    next_id: AtomicU64,
}

impl EnvironmentTable {
    #[must_use]
    pub fn new(engine: Arc<SimulationEngine>) -> Self {
        Self {
            engine,
            envs: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Build an environment of `scenario` and return its new id.
    ///
    /// # Errors
    ///
    /// Anything [`SimulationEngine::create_environment`] returns.
    pub fn create(&self, scenario: &str, config: &Config, seed: u64) -> Result<String> {
        let env = self.engine.create_environment(scenario, config, seed)?;
        let id = format!(
            "{scenario}-{}",
            self.next_id.fetch_add(1, Ordering::Relaxed)
        );
        self.envs
            .write()
            .insert(id.clone(), Arc::new(Mutex::new(env)));
        info!("Created environment '{id}'.");
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Shared> {
        self.envs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SimError::EnvironmentNotFound(id.to_owned()))
    }

    /// # Errors
    ///
    /// [`SimError::EnvironmentNotFound`] for an unknown id, otherwise the
    /// environment's own reset error.
    pub fn reset(&self, id: &str, seed: Option<u64>) -> Result<Vec<Observation>> {
        let env = self.get(id)?;
        let observations = env.lock().reset(seed)?;
        debug!("Reset environment '{id}'.");
        Ok(observations)
    }

    /// Payloads are validated before the environment is touched, so an
    /// empty payload does not consume a step.
    ///
    /// # Errors
    ///
    /// [`SimError::EnvironmentNotFound`] for an unknown id,
    /// [`SimError::EmptyAction`] for an empty payload, otherwise the
    /// environment's own step error.
    pub fn step(&self, id: &str, actions: &[Action]) -> Result<StepResult> {
        let env = self.get(id)?;
        actions.iter().try_for_each(Action::validate)?;
        let mut env = env.lock();
        env.step(actions)
    }

    /// # Errors
    ///
    /// [`SimError::EnvironmentNotFound`] for an unknown id.
    pub fn spaces(&self, id: &str) -> Result<SpaceDefinition> {
        let env = self.get(id)?;
        let spaces = env.lock().spaces();
        Ok(spaces)
    }

    /// # Errors
    ///
    /// [`SimError::EnvironmentNotFound`] for an unknown id.
    pub fn info(&self, id: &str) -> Result<Info> {
        let env = self.get(id)?;
        let info = env.lock().info();
        Ok(info)
    }

    /// Close the environment and forget its id.
    ///
    /// # Errors
    ///
    /// [`SimError::EnvironmentNotFound`] when the id is unknown or was
    /// already closed.
    pub fn close(&self, id: &str) -> Result<()> {
        let env = self
            .envs
            .write()
            .remove(id)
            .ok_or_else(|| SimError::EnvironmentNotFound(id.to_owned()))?;
        env.lock().close()?;
        info!("Closed environment '{id}'.");
        Ok(())
    }

    /// Live ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.envs.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.envs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envs.read().is_empty()
    }
}
