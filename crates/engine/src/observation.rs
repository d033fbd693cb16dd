use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Diagnostic key/value pairs attached to an observation or reported by
/// `Environment::info`. Never read back by the engine.
pub type Metadata = serde_json::Map<String, Value>;

/// Numeric snapshot of an environment after `reset` or `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f64>,
    #[serde(default)]
    metadata: Metadata,
}

impl Observation {
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data,
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insertion.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Metadata flattened to strings, the form transports put on the wire.
    #[must_use]
    pub fn metadata_strings(&self) -> BTreeMap<String, String> {
        self.metadata
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_flattens_to_strings() {
        let obs = Observation::new(vec![1.0])
            .with("label", "upright")
            .with("step", 3)
            .with("x", 0.25)
            .with("done", false);
        let flat = obs.metadata_strings();
        assert_eq!(flat["label"], "upright");
        assert_eq!(flat["step"], "3");
        assert_eq!(flat["x"], "0.25");
        assert_eq!(flat["done"], "false");
        assert_eq!(flat.len(), 4);
    }
}
