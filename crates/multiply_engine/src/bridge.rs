use std::sync::Arc;
use std::time::Duration;

use multiply_core::{
    update, CanonicalState, CorrelationId, CorrelationIds, Effect, Operand, ReducerState,
    ViewBound, ViewModel, WorkerBound,
};
use sync_logging::{sync_info, sync_trace, sync_warn};

use crate::{RemoteSync, SyncSettings, WorkerError, WorkerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Edits go to the background context; the view changes only via patches.
    Bridged,
    /// No background context; edits are reduced in-process and never persisted.
    Local,
}

enum OperandSync {
    Bridged(WorkerHandle),
    Local(ReducerState),
}

/// UI-side owner of the view model and of the chosen sync strategy.
///
/// One bridge per UI session. Dropping it tears the worker down.
pub struct SyncBridge {
    view: ViewModel,
    ids: CorrelationIds,
    sync: OperandSync,
}

impl SyncBridge {
    /// Uses a background context when one can be started, else computes locally.
    pub fn connect(
        snapshot: CanonicalState,
        remote: Arc<dyn RemoteSync>,
        settings: &SyncSettings,
    ) -> Self {
        Self::connect_with(snapshot, WorkerHandle::spawn(remote, settings))
    }

    /// Picks the strategy from the outcome of starting the worker.
    pub fn connect_with(
        snapshot: CanonicalState,
        spawned: Result<WorkerHandle, WorkerError>,
    ) -> Self {
        match spawned {
            Ok(worker) => Self::bridged(snapshot, worker),
            Err(err) => {
                sync_warn!("Background context unavailable ({}); computing locally", err);
                Self::local(snapshot)
            }
        }
    }

    pub fn bridged(snapshot: CanonicalState, worker: WorkerHandle) -> Self {
        sync_info!("Sync bridge running in bridged mode");
        if !worker.post(WorkerBound::Initialize {
            state: snapshot.clone(),
        }) {
            sync_warn!("Worker gone before initialize");
        }
        Self {
            view: ViewModel::from(snapshot),
            ids: CorrelationIds::new(),
            sync: OperandSync::Bridged(worker),
        }
    }

    pub fn local(snapshot: CanonicalState) -> Self {
        sync_info!("Sync bridge running in local mode");
        let (reducer, _) = update(
            ReducerState::new(),
            WorkerBound::Initialize {
                state: snapshot.clone(),
            },
        );
        Self {
            view: ViewModel::from(snapshot),
            ids: CorrelationIds::new(),
            sync: OperandSync::Local(reducer),
        }
    }

    pub fn mode(&self) -> SyncMode {
        match self.sync {
            OperandSync::Bridged(_) => SyncMode::Bridged,
            OperandSync::Local(_) => SyncMode::Local,
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.view.consume_dirty()
    }

    pub fn set_multiplicand(&mut self, text: &str) -> CorrelationId {
        self.set_operand(Operand::Multiplicand, text)
    }

    pub fn set_multiplier(&mut self, text: &str) -> CorrelationId {
        self.set_operand(Operand::Multiplier, text)
    }

    /// Forwards an edit. In bridged mode this never blocks and the view is
    /// untouched until the matching patch is pumped.
    pub fn set_operand(&mut self, operand: Operand, text: &str) -> CorrelationId {
        let id = self.ids.mint();
        let msg = WorkerBound::update(operand, id, text);
        match &mut self.sync {
            OperandSync::Bridged(worker) => {
                if !worker.post(msg) {
                    sync_warn!("Worker gone; edit {} dropped", id);
                }
            }
            OperandSync::Local(reducer) => {
                let (next, effects) = update(std::mem::take(reducer), msg);
                *reducer = next;
                for effect in effects {
                    if let Effect::PostToView(message) = effect {
                        apply(&mut self.view, message);
                    }
                }
            }
        }
        id
    }

    /// Applies every patch that has already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let OperandSync::Bridged(worker) = &self.sync else {
            return 0;
        };
        let mut applied = 0;
        while let Some(message) = worker.try_recv() {
            apply(&mut self.view, message);
            applied += 1;
        }
        applied
    }

    /// Blocks up to `timeout` for one patch, then pumps the rest.
    pub fn wait_for_patch(&mut self, timeout: Duration) -> bool {
        let OperandSync::Bridged(worker) = &self.sync else {
            return false;
        };
        match worker.recv_timeout(timeout) {
            Some(message) => {
                apply(&mut self.view, message);
                self.pump();
                true
            }
            None => false,
        }
    }

    pub fn shutdown(self) {
        if let OperandSync::Bridged(worker) = self.sync {
            worker.shutdown();
        }
    }
}

fn apply(view: &mut ViewModel, message: ViewBound) {
    match message {
        ViewBound::ViewPatch { id, patch } => {
            sync_trace!("Applying patch {}: {:?}", id, patch);
            view.apply_patch(id, &patch);
        }
    }
}
