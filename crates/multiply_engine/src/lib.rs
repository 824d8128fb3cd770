//! Multiply engine: background context, store IO and the UI-side sync bridge.
mod bridge;
mod remote;
mod settings;
mod store;
mod worker;

pub use bridge::{SyncBridge, SyncMode};
pub use remote::{RemoteError, RemoteSync, ReqwestRemoteSync};
pub use settings::{SyncSettings, DEFAULT_API_URL};
pub use store::{bind_store, build_router, serve_store, StateSlot, StoreError, STATE_PATH};
pub use worker::{WorkerError, WorkerHandle};
