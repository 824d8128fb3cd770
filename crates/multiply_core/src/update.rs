use sync_logging::{sync_debug, sync_trace};

use crate::validator::{validate, Validation};
use crate::{CorrelationId, Effect, Operand, ReducerState, ViewBound, ViewPatch, WorkerBound};

/// Pure reducer: applies a UI-bound request to state and returns any effects.
///
/// Validation is synchronous, so patches leave in request order. Any async
/// step added here needs explicit sequencing to keep that property.
pub fn update(mut state: ReducerState, msg: WorkerBound) -> (ReducerState, Vec<Effect>) {
    let effects = match msg {
        WorkerBound::Initialize { state: snapshot } => {
            if state.is_active() {
                sync_debug!("Ignoring initialize: reducer already active");
            } else {
                state.activate(snapshot);
            }
            Vec::new()
        }
        WorkerBound::MultiplicandUpdate { id, value } => {
            apply_operand(&mut state, Operand::Multiplicand, id, &value)
        }
        WorkerBound::MultiplierUpdate { id, value } => {
            apply_operand(&mut state, Operand::Multiplier, id, &value)
        }
    };

    (state, effects)
}

fn apply_operand(
    state: &mut ReducerState,
    operand: Operand,
    id: CorrelationId,
    value: &str,
) -> Vec<Effect> {
    if !state.is_active() {
        sync_debug!("Dropping {:?} update {} before initialize", operand, id);
        return Vec::new();
    }

    let other = state.cached(operand.other());
    let text = value.trim().to_owned();
    let validation = validate(&text);
    state.set_cached(operand, validation.value());

    let Some(canonical) = state.canonical_mut() else {
        return Vec::new();
    };
    canonical.set_operand(operand, text);

    match validation {
        Validation::Valid(value) => {
            // Nothing is emitted until the other operand is a number too.
            let Some(other) = other else {
                sync_trace!("Update {} valid, waiting on {:?}", id, operand.other());
                return Vec::new();
            };
            canonical.product = value * other;
            canonical.error = None;
            let patch = ViewPatch::recomputed(
                operand,
                canonical.operand(operand),
                canonical.product,
            );
            sync_trace!("Update {} -> product {}", id, canonical.product);
            vec![
                Effect::PostToView(ViewBound::ViewPatch { id, patch }),
                Effect::PersistState(canonical.clone()),
            ]
        }
        Validation::Invalid(message) => {
            canonical.error = Some(message.to_owned());
            sync_trace!("Update {} rejected: {}", id, message);
            vec![Effect::PostToView(ViewBound::ViewPatch {
                id,
                patch: ViewPatch::error(message),
            })]
        }
        Validation::Empty => Vec::new(),
    }
}
