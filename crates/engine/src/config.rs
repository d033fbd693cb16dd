//! # Scenario Configuration
//!
//! A flat, schema-less map from string keys to loosely typed values. Each
//! scenario validates the subset of keys it cares about and ignores the
//! rest, so configs written for a newer scenario still load.
//!
//! Values may arrive as native numbers or as numeric strings (transports
//! and CLIs tend to stringify everything); the `get_*` accessors accept
//! both.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Key used to override the seed handed to `create_environment`.
pub const SEED_KEY: &str = "seed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// Parses free text into the most specific value: integer, then float,
    /// then boolean, falling back to a string.
    #[must_use]
    pub fn parse_loose(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return ConfigValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return ConfigValue::Float(f);
        }
        match trimmed {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => ConfigValue::Str(text.to_owned()),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
        }
    }

    /// Native integers and integral numeric strings.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            ConfigValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Native numbers and numeric strings.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            ConfigValue::Int(v) => Some(*v as f64),
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Str(s) => s.trim().parse().ok(),
            ConfigValue::Bool(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            ConfigValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(i64::from(v))
    }
}

impl From<u32> for ConfigValue {
    fn from(v: u32) -> Self {
        ConfigValue::Int(i64::from(v))
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(f64::from(v))
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: HashMap<String, ConfigValue>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object such as `{"max_steps": 200, "tolerance": "0.5"}`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigInvalid`] when the text is not a JSON object
    /// of scalar values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::config("<json>", e.to_string()))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigInvalid`] when present but not an integer
    /// or an integral string.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.coerce(key, "an integer", ConfigValue::as_i64)
    }

    /// `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigInvalid`] when present but not numeric.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        self.coerce(key, "a number", ConfigValue::as_f64)
    }

    /// `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigInvalid`] when present but not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.coerce(key, "a boolean", ConfigValue::as_bool)
    }

    /// Seed override carried under [`SEED_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigInvalid`] for non-integer or negative seeds.
    pub fn seed(&self) -> Result<Option<u64>> {
        match self.get_i64(SEED_KEY)? {
            None => Ok(None),
            Some(v) => u64::try_from(v)
                .map(Some)
                .map_err(|_| SimError::config(SEED_KEY, format!("must be non-negative, got {v}"))),
        }
    }

    fn coerce<T>(
        &self,
        key: &str,
        expected: &str,
        convert: impl Fn(&ConfigValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => convert(value).map(Some).ok_or_else(|| {
                SimError::config(
                    key,
                    format!("must be {expected}, got {} '{value}'", value.type_name()),
                )
            }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
