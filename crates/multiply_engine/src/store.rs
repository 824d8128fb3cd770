//! Durable store: a single last-write-wins state record served over HTTP.

use std::io;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use multiply_core::CanonicalState;
use sync_logging::{sync_info, sync_warn};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub const STATE_PATH: &str = "/api/state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not bind store to {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("store server failed: {0}")]
    Serve(io::Error),
}

/// The one global record. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct StateSlot(Arc<RwLock<CanonicalState>>);

impl StateSlot {
    pub fn new(initial: CanonicalState) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    /// Slot holding the record a fresh deployment starts with.
    pub fn seeded() -> Self {
        Self::new(CanonicalState::new("6", "7", 42.0))
    }

    pub async fn select(&self) -> CanonicalState {
        self.0.read().await.clone()
    }

    pub async fn replace(&self, state: CanonicalState) {
        *self.0.write().await = state;
    }
}

pub fn build_router(slot: StateSlot) -> Router {
    Router::new()
        .route(STATE_PATH, get(select_state).put(replace_state))
        .with_state(slot)
}

pub async fn bind_store(addr: &str) -> Result<TcpListener, StoreError> {
    TcpListener::bind(addr).await.map_err(|source| StoreError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Serves the store until the listener fails.
pub async fn serve_store(listener: TcpListener, slot: StateSlot) -> Result<(), StoreError> {
    if let Ok(addr) = listener.local_addr() {
        sync_info!("Store listening on http://{}{}", addr, STATE_PATH);
    }
    axum::serve(listener, build_router(slot))
        .await
        .map_err(StoreError::Serve)
}

async fn select_state(State(slot): State<StateSlot>) -> Json<CanonicalState> {
    Json(slot.select().await)
}

async fn replace_state(
    State(slot): State<StateSlot>,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let state = CanonicalState::from_json_strict(&body).map_err(|err| {
        sync_warn!("Rejected state write: {}", err);
        (StatusCode::BAD_REQUEST, "Illegal State Type")
    })?;
    sync_info!(
        "Store replaced: {} x {} = {}",
        state.multiplicand,
        state.multiplier,
        state.product
    );
    slot.replace(state).await;
    Ok(StatusCode::NO_CONTENT)
}
