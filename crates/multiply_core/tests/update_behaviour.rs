use std::sync::Once;

use multiply_core::{
    update, CanonicalState, CorrelationId, Effect, Operand, ReducerState, ViewBound, ViewPatch,
    WorkerBound, NOT_A_NUMBER,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(sync_logging::initialize_for_tests);
}

fn active(multiplicand: &str, multiplier: &str, product: f64) -> ReducerState {
    let (state, effects) = update(
        ReducerState::new(),
        WorkerBound::Initialize {
            state: CanonicalState::new(multiplicand, multiplier, product),
        },
    );
    assert!(effects.is_empty());
    state
}

fn send(state: ReducerState, operand: Operand, id: u64, value: &str) -> (ReducerState, Vec<Effect>) {
    update(
        state,
        WorkerBound::update(operand, CorrelationId::new(id), value),
    )
}

fn canonical(state: &ReducerState) -> CanonicalState {
    state.canonical().cloned().expect("reducer active")
}

#[test]
fn multiplicand_update_patches_and_persists() {
    init_logging();
    let (state, effects) = send(active("6", "7", 42.0), Operand::Multiplicand, 1, "8");

    let expected_state = CanonicalState::new("8", "7", 56.0);
    assert_eq!(
        effects,
        vec![
            Effect::PostToView(ViewBound::ViewPatch {
                id: CorrelationId::new(1),
                patch: ViewPatch {
                    multiplicand: Some("8".to_string()),
                    product: Some(56.0),
                    ..ViewPatch::default()
                },
            }),
            Effect::PersistState(expected_state.clone()),
        ]
    );
    assert_eq!(canonical(&state), expected_state);
}

#[test]
fn invalid_multiplier_reports_error_without_persisting() {
    init_logging();
    let (state, effects) = send(active("6", "7", 42.0), Operand::Multiplier, 2, "x");

    assert_eq!(
        effects,
        vec![Effect::PostToView(ViewBound::ViewPatch {
            id: CorrelationId::new(2),
            patch: ViewPatch::error(NOT_A_NUMBER),
        })]
    );
    let state = canonical(&state);
    assert_eq!(state.product, 42.0);
    assert_eq!(state.multiplier, "x");
    assert_eq!(state.error.as_deref(), Some(NOT_A_NUMBER));
}

#[test]
fn update_text_is_trimmed_before_storing() {
    init_logging();
    let (state, effects) = send(active("6", "7", 42.0), Operand::Multiplier, 3, "  2 \t");

    assert_eq!(canonical(&state).multiplier, "2");
    assert_eq!(
        effects[0],
        Effect::PostToView(ViewBound::ViewPatch {
            id: CorrelationId::new(3),
            patch: ViewPatch::recomputed(Operand::Multiplier, "2", 12.0),
        })
    );
}

#[test]
fn empty_operand_is_silent_and_leaves_product_and_error() {
    init_logging();
    let (state, _) = send(active("6", "7", 42.0), Operand::Multiplier, 1, "x");
    let (state, effects) = send(state, Operand::Multiplicand, 2, "   ");

    assert!(effects.is_empty());
    let snapshot = canonical(&state);
    assert_eq!(snapshot.multiplicand, "");
    assert_eq!(snapshot.product, 42.0);
    assert_eq!(snapshot.error.as_deref(), Some(NOT_A_NUMBER));
    assert_eq!(state.cached(Operand::Multiplicand), None);
}

#[test]
fn valid_operand_with_invalid_partner_emits_no_patch() {
    // The new text is stored but the view is not told until both are numbers.
    init_logging();
    let (state, _) = send(active("6", "7", 42.0), Operand::Multiplier, 1, "x");
    let (state, effects) = send(state, Operand::Multiplicand, 2, "9");

    assert!(effects.is_empty());
    let snapshot = canonical(&state);
    assert_eq!(snapshot.multiplicand, "9");
    assert_eq!(snapshot.product, 42.0);
    assert_eq!(snapshot.error.as_deref(), Some(NOT_A_NUMBER));
}

#[test]
fn fixing_the_invalid_operand_clears_error() {
    init_logging();
    let (state, _) = send(active("6", "7", 42.0), Operand::Multiplier, 1, "x");
    let (state, effects) = send(state, Operand::Multiplier, 2, "3");

    assert_eq!(effects.len(), 2);
    assert_eq!(canonical(&state), CanonicalState::new("6", "3", 18.0));
}

#[test]
fn zero_counts_as_a_present_operand() {
    init_logging();
    let (state, effects) = send(active("0", "7", 0.0), Operand::Multiplier, 1, "5");

    assert_eq!(canonical(&state).product, 0.0);
    assert!(matches!(effects.last(), Some(Effect::PersistState(_))));
}

#[test]
fn snapshot_errors_are_kept_but_numbers_cached() {
    init_logging();
    let mut snapshot = CanonicalState::new("4", "oops", 0.0);
    snapshot.error = Some(NOT_A_NUMBER.to_string());
    let (state, _) = update(ReducerState::new(), WorkerBound::Initialize { state: snapshot });

    assert_eq!(state.cached(Operand::Multiplicand), Some(4.0));
    assert_eq!(state.cached(Operand::Multiplier), None);
    assert_eq!(canonical(&state).error.as_deref(), Some(NOT_A_NUMBER));

    let (state, effects) = send(state, Operand::Multiplier, 1, "2.5");
    assert_eq!(effects.len(), 2);
    assert_eq!(canonical(&state), CanonicalState::new("4", "2.5", 10.0));
}

#[test]
fn repeated_request_value_does_not_accumulate() {
    init_logging();
    let (once, first) = send(active("6", "7", 42.0), Operand::Multiplicand, 1, "8");
    let (twice, second) = send(once.clone(), Operand::Multiplicand, 2, "8");

    assert_eq!(once, twice);
    assert_eq!(first.len(), second.len());
    assert_eq!(first[1], second[1]);
}
