use crate::{CanonicalState, CorrelationId, ViewPatch};

/// UI-side projection of [`CanonicalState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub multiplicand: String,
    pub multiplier: String,
    pub product: f64,
    pub error: Option<String>,
    /// Correlation id of the most recently applied patch.
    pub last_patch: Option<CorrelationId>,
    dirty: bool,
}

impl From<CanonicalState> for ViewModel {
    fn from(state: CanonicalState) -> Self {
        Self {
            multiplicand: state.multiplicand,
            multiplier: state.multiplier,
            product: state.product,
            error: state.error,
            last_patch: None,
            dirty: true,
        }
    }
}

impl ViewModel {
    /// Merges the fields present in `patch`.
    ///
    /// A patch carrying `product` comes from a successful recomputation,
    /// which also cleared the canonical error; an error-only patch leaves
    /// every other field alone.
    pub fn apply_patch(&mut self, id: CorrelationId, patch: &ViewPatch) {
        if let Some(text) = &patch.multiplicand {
            self.multiplicand.clone_from(text);
        }
        if let Some(text) = &patch.multiplier {
            self.multiplier.clone_from(text);
        }
        if let Some(product) = patch.product {
            self.product = product;
            self.error = None;
        }
        if let Some(error) = &patch.error {
            self.error = Some(error.clone());
        }
        self.last_patch = Some(id);
        self.dirty = true;
    }

    pub fn to_canonical(&self) -> CanonicalState {
        CanonicalState {
            multiplicand: self.multiplicand.clone(),
            multiplier: self.multiplier.clone(),
            product: self.product,
            error: self.error.clone(),
        }
    }

    /// Line shown under the inputs: the error if any, else the product.
    pub fn result_text(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("Result: {}", self.product),
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
