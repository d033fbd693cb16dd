//! # Space Descriptors
//!
//! Declarative shape and range of a scenario's actions and observations.
//! These are descriptive only: no environment is required to clip or
//! reject values that fall outside them, and several don't.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    Box,
    Discrete,
    MultiDiscrete,
    MultiBinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Float32,
    Float64,
    Int32,
    Int64,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    #[serde(rename = "type")]
    pub kind: SpaceType,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
    /// Concrete values of each discrete choice, when they are not simply
    /// `0..n`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discrete_values: Vec<f64>,
}

impl ActionSpace {
    /// Continuous box with one bound per element.
    #[must_use]
    pub fn boxed(low: Vec<f64>, high: Vec<f64>) -> Self {
        let shape = vec![low.len()];
        Self {
            kind: SpaceType::Box,
            low,
            high,
            shape,
            dtype: Dtype::Float32,
            discrete_values: Vec::new(),
        }
    }

    /// `n` choices numbered `0..n`, scalar shaped.
    #[must_use]
    pub fn discrete(n: u32) -> Self {
        Self {
            kind: SpaceType::Discrete,
            low: vec![0.0],
            high: vec![f64::from(n.saturating_sub(1))],
            shape: Vec::new(),
            dtype: Dtype::Int32,
            discrete_values: Vec::new(),
        }
    }

    /// Number of choices for a discrete space.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn num_choices(&self) -> Option<usize> {
        if self.kind != SpaceType::Discrete {
            return None;
        }
        if !self.discrete_values.is_empty() {
            return Some(self.discrete_values.len());
        }
        let low = self.low.first().copied().unwrap_or(0.0);
        let high = self.high.first().copied().unwrap_or(0.0);
        Some((high - low).max(0.0) as usize + 1)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        shape_size(&self.shape)
    }

    /// Whether `values` lies inside this space. Purely advisory.
    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        contains(self.kind, &self.low, &self.high, &self.shape, values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    #[serde(rename = "type")]
    pub kind: SpaceType,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
}

impl ObservationSpace {
    #[must_use]
    pub fn boxed(low: Vec<f64>, high: Vec<f64>) -> Self {
        let shape = vec![low.len()];
        Self {
            kind: SpaceType::Box,
            low,
            high,
            shape,
            dtype: Dtype::Float32,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        shape_size(&self.shape)
    }

    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        contains(self.kind, &self.low, &self.high, &self.shape, values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDefinition {
    pub action_space: ActionSpace,
    pub observation_space: ObservationSpace,
}

/// Product of the dimensions; a scalar (empty) shape holds one element.
#[must_use]
pub fn shape_size(shape: &[usize]) -> usize {
    shape.iter().product()
}

fn bound(bounds: &[f64], i: usize) -> Option<f64> {
    match bounds {
        [single] => Some(*single),
        many => many.get(i).copied(),
    }
}

fn contains(kind: SpaceType, low: &[f64], high: &[f64], shape: &[usize], values: &[f64]) -> bool {
    if values.len() != shape_size(shape) {
        return false;
    }
    values.iter().enumerate().all(|(i, &v)| {
        let in_range = match (bound(low, i), bound(high, i)) {
            (Some(lo), Some(hi)) => v >= lo && v <= hi,
            _ => false,
        };
        match kind {
            SpaceType::Box => in_range,
            SpaceType::Discrete | SpaceType::MultiDiscrete => in_range && v.fract() == 0.0,
            SpaceType::MultiBinary => v == 0.0 || v == 1.0,
        }
    })
}
