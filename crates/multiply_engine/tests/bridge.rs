use std::sync::{Arc, Mutex};
use std::time::Duration;

use multiply_core::{fallback_state, CanonicalState, CorrelationId, NOT_A_NUMBER};
use multiply_engine::{
    RemoteError, RemoteSync, SyncBridge, SyncMode, SyncSettings, WorkerError,
};
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct CountingRemote {
    writes: Mutex<usize>,
}

#[async_trait::async_trait]
impl RemoteSync for CountingRemote {
    async fn persist(&self, _state: &CanonicalState) -> Result<(), RemoteError> {
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

fn bridged() -> SyncBridge {
    let bridge = SyncBridge::connect(
        CanonicalState::new("6", "7", 42.0),
        Arc::new(CountingRemote::default()),
        &SyncSettings::default(),
    );
    assert_eq!(bridge.mode(), SyncMode::Bridged);
    bridge
}

fn local() -> SyncBridge {
    SyncBridge::local(CanonicalState::new("6", "7", 42.0))
}

#[test]
fn bridged_edit_changes_view_only_through_patch() {
    let mut bridge = bridged();
    let id = bridge.set_multiplicand("8");

    // Nothing is applied until the patch is pumped.
    assert_eq!(bridge.view().multiplicand, "6");
    assert_eq!(bridge.view().product, 42.0);

    assert!(bridge.wait_for_patch(WAIT));
    assert_eq!(bridge.view().to_canonical(), CanonicalState::new("8", "7", 56.0));
    assert_eq!(bridge.view().last_patch, Some(id));
}

#[test]
fn bridged_error_patch_keeps_product() {
    let mut bridge = bridged();
    bridge.set_multiplier("x");

    assert!(bridge.wait_for_patch(WAIT));
    let view = bridge.view();
    assert_eq!(view.error.as_deref(), Some(NOT_A_NUMBER));
    assert_eq!(view.product, 42.0);
    assert_eq!(view.multiplier, "7");
}

#[test]
fn local_mode_applies_edits_immediately() {
    let mut bridge = local();
    assert_eq!(bridge.mode(), SyncMode::Local);

    let id = bridge.set_multiplier("2");
    assert_eq!(bridge.view().to_canonical(), CanonicalState::new("6", "2", 12.0));
    assert_eq!(bridge.view().last_patch, Some(id));
    assert_eq!(bridge.pump(), 0);
    assert!(!bridge.wait_for_patch(Duration::from_millis(10)));
}

#[test]
fn local_and_bridged_modes_agree() {
    let edits: [(bool, &str); 6] = [
        (true, "3"),
        (false, "x"),
        (true, "4"),
        (false, ""),
        (false, "2.5"),
        (true, " -2 "),
    ];

    let mut remote_side = bridged();
    let mut local_side = local();
    for (is_multiplicand, text) in edits {
        for bridge in [&mut remote_side, &mut local_side] {
            if is_multiplicand {
                bridge.set_multiplicand(text);
            } else {
                bridge.set_multiplier(text);
            }
        }
    }

    let last = CorrelationId::new(6);
    while remote_side.view().last_patch != Some(last) {
        assert!(remote_side.wait_for_patch(WAIT), "patch {last} never arrived");
    }

    let expected = local_side.view().to_canonical();
    assert_eq!(expected.multiplicand, "-2");
    assert_eq!(expected.product, -5.0);
    assert_eq!(remote_side.view().to_canonical(), expected);
}

#[test]
fn view_starts_dirty_and_reports_patches() {
    let mut bridge = local();
    assert!(bridge.consume_dirty());
    assert!(!bridge.consume_dirty());

    bridge.set_multiplicand("");
    assert!(!bridge.consume_dirty());

    bridge.set_multiplicand("1");
    assert!(bridge.consume_dirty());
}

#[test]
fn fallback_snapshot_keeps_error_until_recomputed() {
    let mut bridge = SyncBridge::local(fallback_state());
    assert_eq!(bridge.view().result_text(), "Unable to reconstitute view state");

    bridge.set_multiplicand("5");
    assert_eq!(bridge.view().result_text(), "Result: 0");
}

#[test]
fn failed_worker_start_falls_back_to_local() {
    let mut bridge = SyncBridge::connect_with(
        CanonicalState::new("6", "7", 42.0),
        Err(WorkerError::Startup),
    );
    assert_eq!(bridge.mode(), SyncMode::Local);

    bridge.set_multiplicand("8");
    assert_eq!(bridge.view().to_canonical(), CanonicalState::new("8", "7", 56.0));

    bridge.set_multiplier("x");
    assert_eq!(bridge.view().error.as_deref(), Some(NOT_A_NUMBER));
    assert_eq!(bridge.view().product, 56.0);
}
