use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::validator::validate;
use crate::Operand;

/// The authoritative operand/product/error record.
///
/// The serde shape doubles as the wire format accepted by the store: exactly
/// `multiplicand`, `multiplier` and `product`, plus an optional string
/// `error`. Unknown fields and a `null` error are rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalState {
    pub multiplicand: String,
    pub multiplier: String,
    pub product: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_string"
    )]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateRejected {
    #[error("empty state payload")]
    Empty,
    #[error("illegal state payload: {0}")]
    Malformed(String),
}

impl CanonicalState {
    pub fn new(
        multiplicand: impl Into<String>,
        multiplier: impl Into<String>,
        product: f64,
    ) -> Self {
        Self {
            multiplicand: multiplicand.into(),
            multiplier: multiplier.into(),
            product,
            error: None,
        }
    }

    /// Strict acceptance check applied to externally supplied state payloads.
    pub fn from_json_strict(payload: &[u8]) -> Result<Self, StateRejected> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Err(StateRejected::Empty);
        }
        serde_json::from_slice(payload).map_err(|err| StateRejected::Malformed(err.to_string()))
    }

    pub fn operand(&self, operand: Operand) -> &str {
        match operand {
            Operand::Multiplicand => &self.multiplicand,
            Operand::Multiplier => &self.multiplier,
        }
    }

    pub(crate) fn set_operand(&mut self, operand: Operand, text: String) {
        match operand {
            Operand::Multiplicand => self.multiplicand = text,
            Operand::Multiplier => self.multiplier = text,
        }
    }
}

fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// Reducer-side state: uninitialized until the first `initialize` message,
/// then active for the rest of the worker's lifetime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReducerState {
    canonical: Option<CanonicalState>,
    multiplicand: Option<f64>,
    multiplier: Option<f64>,
}

impl ReducerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.canonical.is_some()
    }

    pub fn canonical(&self) -> Option<&CanonicalState> {
        self.canonical.as_ref()
    }

    /// Last parsed value of an operand, if its current text is a number.
    pub fn cached(&self, operand: Operand) -> Option<f64> {
        match operand {
            Operand::Multiplicand => self.multiplicand,
            Operand::Multiplier => self.multiplier,
        }
    }

    pub(crate) fn activate(&mut self, snapshot: CanonicalState) {
        // Snapshot errors are display state; only the numbers are cached.
        self.multiplicand = validate(snapshot.multiplicand.trim()).value();
        self.multiplier = validate(snapshot.multiplier.trim()).value();
        self.canonical = Some(snapshot);
    }

    pub(crate) fn set_cached(&mut self, operand: Operand, value: Option<f64>) {
        match operand {
            Operand::Multiplicand => self.multiplicand = value,
            Operand::Multiplier => self.multiplier = value,
        }
    }

    pub(crate) fn canonical_mut(&mut self) -> Option<&mut CanonicalState> {
        self.canonical.as_mut()
    }
}
