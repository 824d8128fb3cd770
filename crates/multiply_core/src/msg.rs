//! Messages exchanged between the UI context and the background context.
//!
//! Both directions serialize as JSON objects tagged by `kind`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CanonicalState;

/// Opaque token linking an update request to the patch it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session-scoped source of fresh correlation ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationIds {
    next: u64,
}

impl Default for CorrelationIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl CorrelationIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self) -> CorrelationId {
        let id = CorrelationId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Multiplicand,
    Multiplier,
}

impl Operand {
    pub fn other(self) -> Self {
        match self {
            Operand::Multiplicand => Operand::Multiplier,
            Operand::Multiplier => Operand::Multiplicand,
        }
    }
}

/// UI context -> background context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WorkerBound {
    /// Hands the full snapshot to the reducer; sent once per worker lifetime.
    Initialize { state: CanonicalState },
    MultiplicandUpdate { id: CorrelationId, value: String },
    MultiplierUpdate { id: CorrelationId, value: String },
}

impl WorkerBound {
    pub fn update(operand: Operand, id: CorrelationId, value: impl Into<String>) -> Self {
        let value = value.into();
        match operand {
            Operand::Multiplicand => WorkerBound::MultiplicandUpdate { id, value },
            Operand::Multiplier => WorkerBound::MultiplierUpdate { id, value },
        }
    }
}

/// Background context -> UI context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViewBound {
    ViewPatch { id: CorrelationId, patch: ViewPatch },
}

impl ViewBound {
    pub fn id(&self) -> CorrelationId {
        match self {
            ViewBound::ViewPatch { id, .. } => *id,
        }
    }
}

/// Partial view update; absent fields are left untouched by the receiver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ViewPatch {
    /// Patch for a successful recomputation triggered by `operand`.
    pub fn recomputed(operand: Operand, text: impl Into<String>, product: f64) -> Self {
        let text = Some(text.into());
        let (multiplicand, multiplier) = match operand {
            Operand::Multiplicand => (text, None),
            Operand::Multiplier => (None, text),
        };
        Self {
            multiplicand,
            multiplier,
            product: Some(product),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.multiplicand.is_none()
            && self.multiplier.is_none()
            && self.product.is_none()
            && self.error.is_none()
    }
}
