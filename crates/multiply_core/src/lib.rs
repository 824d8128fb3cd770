//! Multiply core: validator, message protocol, pure reducer and view-model helpers.
mod effect;
mod msg;
mod snapshot;
mod state;
mod update;
mod validator;
mod view_model;

pub use effect::Effect;
pub use msg::{CorrelationId, CorrelationIds, Operand, ViewBound, ViewPatch, WorkerBound};
pub use snapshot::{fallback_state, reconstitute, FALLBACK_ERROR};
pub use state::{CanonicalState, ReducerState, StateRejected};
pub use update::update;
pub use validator::{validate, Validation, NOT_A_NUMBER};
pub use view_model::ViewModel;
