//! Pipeline session state machine

use thiserror::Error;

use crate::domain::description::{DescriptionError, DescriptionResult};
use crate::domain::error::EncodingError;

use super::state::{CycleId, FailureReason, HandleId, PipelinePhase, PipelineState};

/// Error when a transition does not apply to the current state or cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: PipelinePhase,
    pub action: String,
}

/// Pipeline session entity.
///
/// State machine:
///   IDLE | DONE | FAILED | CANCELLED -> PREPROCESSING (begin_capture)
///   PREPROCESSING -> REQUESTING (start_requesting)
///   PREPROCESSING -> FAILED (fail_encoding)
///   REQUESTING -> DONE | FAILED | CANCELLED (finish)
///   PREPROCESSING | REQUESTING -> CANCELLED (cancel)
///
/// Transitions tagged with an older cycle or handle are rejected, which is
/// how late results of superseded requests get discarded.
#[derive(Debug, Default)]
pub struct PipelineSession {
    state: PipelineState,
    cycle: CycleId,
}

impl PipelineSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn phase(&self) -> PipelinePhase {
        self.state.phase()
    }

    /// The most recently started cycle
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn reject(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.phase(),
            action: action.to_string(),
        }
    }

    /// Start a new cycle. An active cycle must be cancelled first.
    pub fn begin_capture(&mut self) -> Result<CycleId, InvalidStateTransition> {
        if self.is_active() {
            return Err(self.reject("begin capture"));
        }
        self.cycle = CycleId(self.cycle.0 + 1);
        self.state = PipelineState::Preprocessing;
        Ok(self.cycle)
    }

    /// Whether `cycle` is live and still waiting for its payload
    pub fn awaiting_payload(&self, cycle: CycleId) -> bool {
        self.state == PipelineState::Preprocessing && cycle == self.cycle
    }

    /// Payload ready, request issued under `handle`
    pub fn start_requesting(
        &mut self,
        cycle: CycleId,
        handle: HandleId,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Preprocessing || cycle != self.cycle {
            return Err(self.reject("start requesting"));
        }
        self.state = PipelineState::Requesting(handle);
        Ok(())
    }

    /// Preprocessing failed
    pub fn fail_encoding(
        &mut self,
        cycle: CycleId,
        error: EncodingError,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Preprocessing || cycle != self.cycle {
            return Err(self.reject("fail preprocessing"));
        }
        self.state = PipelineState::Failed(FailureReason::Encoding(error));
        Ok(())
    }

    /// Commit the outcome of the request tracked under `handle`
    pub fn finish(
        &mut self,
        handle: HandleId,
        outcome: Result<DescriptionResult, DescriptionError>,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Requesting(handle) {
            return Err(self.reject("finish request"));
        }
        self.state = match outcome {
            Ok(result) => PipelineState::Done(result),
            Err(DescriptionError::Cancelled) => PipelineState::Cancelled,
            Err(e) => PipelineState::Failed(FailureReason::Description(e)),
        };
        Ok(())
    }

    /// Abandon the active cycle. Returns the handle that was in flight.
    pub fn cancel(&mut self) -> Result<Option<HandleId>, InvalidStateTransition> {
        let handle = match self.state {
            PipelineState::Preprocessing => None,
            PipelineState::Requesting(handle) => Some(handle),
            _ => return Err(self.reject("cancel")),
        };
        self.state = PipelineState::Cancelled;
        Ok(handle)
    }
}
