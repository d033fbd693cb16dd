//! # Actions
//!
//! An [`Action`] carries exactly one payload. Scenarios decode the payload
//! through the widening accessors below and declare up front which
//! [`ActionKind`]s they understand; anything else is rejected with
//! [`SimError::UnsupportedActionType`].
//!
//! Accessors never look at a space definition. Range checks, where a
//! scenario has them at all, live inside that scenario's `step`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Payload-free tag of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Float,
    Int,
    Bool,
    Str,
    FloatSeq,
    IntSeq,
    BoolSeq,
    Bytes,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Float => "float",
            ActionKind::Int => "int",
            ActionKind::Bool => "bool",
            ActionKind::Str => "string",
            ActionKind::FloatSeq => "float sequence",
            ActionKind::IntSeq => "int sequence",
            ActionKind::BoolSeq => "bool sequence",
            ActionKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Externally supplied control input for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
    FloatSeq(Vec<f64>),
    IntSeq(Vec<i64>),
    BoolSeq(Vec<bool>),
    Bytes(Vec<u8>),
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Float(_) => ActionKind::Float,
            Action::Int(_) => ActionKind::Int,
            Action::Bool(_) => ActionKind::Bool,
            Action::Str(_) => ActionKind::Str,
            Action::FloatSeq(_) => ActionKind::FloatSeq,
            Action::IntSeq(_) => ActionKind::IntSeq,
            Action::BoolSeq(_) => ActionKind::BoolSeq,
            Action::Bytes(_) => ActionKind::Bytes,
        }
    }

    /// Fails only when the payload is absent, i.e. an empty string,
    /// sequence or byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyAction`] for an empty payload.
    pub fn validate(&self) -> Result<()> {
        let empty = match self {
            Action::Float(_) | Action::Int(_) | Action::Bool(_) => false,
            Action::Str(s) => s.is_empty(),
            Action::FloatSeq(v) => v.is_empty(),
            Action::IntSeq(v) => v.is_empty(),
            Action::BoolSeq(v) => v.is_empty(),
            Action::Bytes(v) => v.is_empty(),
        };
        if empty {
            Err(SimError::EmptyAction)
        } else {
            Ok(())
        }
    }

    /// Rejects the action unless its tag is one of `accepted`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedActionType`] naming `scenario`.
    pub fn expect_kind(&self, scenario: &'static str, accepted: &[ActionKind]) -> Result<()> {
        let kind = self.kind();
        if accepted.contains(&kind) {
            Ok(())
        } else {
            Err(SimError::UnsupportedActionType { scenario, kind })
        }
    }

    /// Widens `Float` and `Int` payloads to `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TypeConversion`] for every other tag.
    pub fn as_f64(&self) -> Result<f64> {
        match *self {
            Action::Float(v) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            Action::Int(v) => Ok(v as f64),
            _ => Err(self.conversion_error("f64")),
        }
    }

    /// `Int` as-is, `Float` truncated toward zero (saturating at the
    /// `i64` bounds, NaN maps to zero).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TypeConversion`] for every other tag.
    pub fn as_i64(&self) -> Result<i64> {
        match *self {
            Action::Int(v) => Ok(v),
            #[allow(clippy::cast_possible_truncation)]
            Action::Float(v) => Ok(v.trunc() as i64),
            _ => Err(self.conversion_error("i64")),
        }
    }

    /// `Bool` as-is; numeric payloads are `true` when non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TypeConversion`] for strings and sequences.
    pub fn as_bool(&self) -> Result<bool> {
        match *self {
            Action::Bool(v) => Ok(v),
            Action::Int(v) => Ok(v != 0),
            Action::Float(v) => Ok(v != 0.0),
            _ => Err(self.conversion_error("bool")),
        }
    }

    /// Display form of the payload. Never fails.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Converts a sequence payload element by element with the `f64` rule.
    /// A single non-convertible element fails the whole conversion.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TypeConversion`] for scalars, strings, bool
    /// sequences and byte buffers.
    pub fn as_f64_vec(&self) -> Result<Vec<f64>> {
        match self {
            Action::FloatSeq(v) => Ok(v.clone()),
            #[allow(clippy::cast_precision_loss)]
            Action::IntSeq(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            _ => Err(self.conversion_error("f64 sequence")),
        }
    }

    fn conversion_error(&self, to: &'static str) -> SimError {
        SimError::TypeConversion {
            from: self.kind(),
            to,
        }
    }
}

fn write_seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Float(v) => write!(f, "{v}"),
            Action::Int(v) => write!(f, "{v}"),
            Action::Bool(v) => write!(f, "{v}"),
            Action::Str(s) => f.write_str(s),
            Action::FloatSeq(v) => write_seq(f, v),
            Action::IntSeq(v) => write_seq(f, v),
            Action::BoolSeq(v) => write_seq(f, v),
            Action::Bytes(v) => write_seq(f, v),
        }
    }
}

impl From<f64> for Action {
    fn from(v: f64) -> Self {
        Action::Float(v)
    }
}

impl From<f32> for Action {
    fn from(v: f32) -> Self {
        Action::Float(f64::from(v))
    }
}

impl From<i64> for Action {
    fn from(v: i64) -> Self {
        Action::Int(v)
    }
}

impl From<i32> for Action {
    fn from(v: i32) -> Self {
        Action::Int(i64::from(v))
    }
}

impl From<bool> for Action {
    fn from(v: bool) -> Self {
        Action::Bool(v)
    }
}

impl From<&str> for Action {
    fn from(v: &str) -> Self {
        Action::Str(v.to_owned())
    }
}

impl From<String> for Action {
    fn from(v: String) -> Self {
        Action::Str(v)
    }
}

impl From<Vec<f64>> for Action {
    fn from(v: Vec<f64>) -> Self {
        Action::FloatSeq(v)
    }
}

impl From<Vec<i64>> for Action {
    fn from(v: Vec<i64>) -> Self {
        Action::IntSeq(v)
    }
}

impl From<Vec<bool>> for Action {
    fn from(v: Vec<bool>) -> Self {
        Action::BoolSeq(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_sequences_with_brackets() {
        assert_eq!(Action::IntSeq(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(Action::Bytes(vec![]).to_string(), "[]");
        assert_eq!(Action::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn float_truncates_toward_zero() {
        assert_eq!(Action::Float(-2.9).as_i64().unwrap(), -2);
        assert_eq!(Action::Float(2.9).as_i64().unwrap(), 2);
    }
}
