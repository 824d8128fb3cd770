use crate::{CanonicalState, ViewBound};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver a message to the UI context.
    PostToView(ViewBound),
    /// Best-effort write of the full state to the durable store.
    PersistState(CanonicalState),
}
