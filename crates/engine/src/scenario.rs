use crate::config::Config;
use crate::env::Environment;
use crate::error::Result;
use crate::spaces::SpaceDefinition;

/// Stateless factory and config validator for one family of environments.
///
/// A scenario holds no mutable state, so one instance can hand out any
/// number of environments, from any thread.
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Spaces of the environments this scenario creates.
    fn spaces(&self) -> SpaceDefinition;

    /// Check the keys this scenario understands; others are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::ConfigInvalid`] naming the offending key.
    fn validate_config(&self, config: &Config) -> Result<()>;

    /// Build a fresh environment whose random source starts from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SimError::ConfigInvalid`] or
    /// [`crate::SimError::EnvironmentConstruction`].
    fn create_environment(&self, config: &Config, seed: u64) -> Result<Box<dyn Environment>>;
}
