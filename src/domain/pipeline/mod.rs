//! Pipeline domain module

mod session;
mod state;

pub use session::{InvalidStateTransition, PipelineSession};
pub use state::{CycleId, FailureReason, HandleId, PipelinePhase, PipelineState};
