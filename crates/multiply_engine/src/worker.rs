//! Background computation context.
//!
//! A dedicated thread owns the reducer state and processes requests strictly
//! in arrival order. Persistence runs on a tokio runtime owned by the same
//! thread, one call at a time, so store writes land in emission order.

use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use multiply_core::{update, CanonicalState, Effect, ReducerState, ViewBound, WorkerBound};
use sync_logging::{sync_debug, sync_info, sync_warn};
use thiserror::Error;

use crate::{RemoteSync, SyncSettings};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("could not start worker thread: {0}")]
    Thread(io::Error),
    #[error("could not start worker runtime: {0}")]
    Runtime(io::Error),
    #[error("worker exited during startup")]
    Startup,
}

/// UI-side handle to the background context.
///
/// Dropping the handle closes the request channel; the worker drains queued
/// persistence calls for up to `drain_timeout` and the drop waits for it.
pub struct WorkerHandle {
    request_tx: Option<mpsc::Sender<WorkerBound>>,
    view_rx: mpsc::Receiver<ViewBound>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn spawn(remote: Arc<dyn RemoteSync>, settings: &SyncSettings) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = mpsc::channel();
        let (view_tx, view_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        let drain_timeout = settings.drain_timeout;

        let thread = thread::Builder::new()
            .name("multiply-worker".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(1)
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run_worker(runtime, remote, request_rx, view_tx, drain_timeout);
            })
            .map_err(WorkerError::Thread)?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                let _ = thread.join();
                return Err(WorkerError::Runtime(err));
            }
            Err(_) => {
                let _ = thread.join();
                return Err(WorkerError::Startup);
            }
        }

        Ok(Self {
            request_tx: Some(request_tx),
            view_rx,
            thread: Some(thread),
        })
    }

    /// Non-blocking send. Returns false once the worker is gone.
    pub fn post(&self, msg: WorkerBound) -> bool {
        match &self.request_tx {
            Some(tx) => tx.send(msg).is_ok(),
            None => false,
        }
    }

    pub fn try_recv(&self) -> Option<ViewBound> {
        self.view_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ViewBound> {
        self.view_rx.recv_timeout(timeout).ok()
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.request_tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                sync_warn!("Worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    remote: Arc<dyn RemoteSync>,
    requests: mpsc::Receiver<WorkerBound>,
    view_tx: mpsc::Sender<ViewBound>,
    drain_timeout: Duration,
) {
    sync_info!("Worker started");
    let (persist_tx, mut persist_rx) = tokio::sync::mpsc::unbounded_channel::<CanonicalState>();
    let persister = runtime.spawn(async move {
        while let Some(state) = persist_rx.recv().await {
            if let Err(err) = remote.persist(&state).await {
                sync_warn!("Persisting state failed: {}", err);
            }
        }
    });

    let mut state = ReducerState::new();
    while let Ok(msg) = requests.recv() {
        let (next, effects) = update(state, msg);
        state = next;
        for effect in effects {
            match effect {
                Effect::PostToView(message) => {
                    if view_tx.send(message).is_err() {
                        sync_debug!("View context gone; patch dropped");
                    }
                }
                Effect::PersistState(snapshot) => {
                    if persist_tx.send(snapshot).is_err() {
                        sync_debug!("Persister gone; state write dropped");
                    }
                }
            }
        }
    }

    drop(persist_tx);
    let drained = runtime.block_on(async { tokio::time::timeout(drain_timeout, persister).await });
    if drained.is_err() {
        sync_warn!("Worker stopped with persistence still in flight");
    }
    sync_info!("Worker stopped");
}
