//! Interrupt handling for a describe run

use std::sync::Arc;

use crate::application::ports::{HttpTransport, ImagePreprocessor};
use crate::application::PipelineController;
use crate::domain::pipeline::PipelineState;

use super::app::EXIT_CANCELLED;

/// What a Ctrl-C does in a given pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Cancel the active cycle; the run reports `Cancelled`
    Cancel,
    /// Nothing to cancel; leave with the cancelled exit code
    Exit,
}

impl InterruptAction {
    pub fn for_state(state: &PipelineState) -> Self {
        if state.is_active() {
            Self::Cancel
        } else {
            Self::Exit
        }
    }
}

/// Listen for Ctrl-C for the rest of the process.
///
/// tokio keeps its SIGINT handler installed once registered, so this task
/// stays alive after the cycle and exits the process itself.
pub fn listen_for_interrupt<P, T>(controller: Arc<PipelineController<P, T>>)
where
    P: ImagePreprocessor,
    T: HttpTransport + 'static,
{
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "could not listen for Ctrl-C");
                return;
            }

            let state = controller.state().await;
            match InterruptAction::for_state(&state) {
                InterruptAction::Cancel => {
                    tracing::debug!(state = %state.phase(), "interrupt received, cancelling");
                    controller.cancel().await;
                }
                InterruptAction::Exit => {
                    tracing::debug!(state = %state.phase(), "interrupt received, exiting");
                    std::process::exit(i32::from(EXIT_CANCELLED));
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::description::{DescriptionResult, TokenUsage};
    use crate::domain::pipeline::HandleId;

    #[test]
    fn interrupt_cancels_active_cycle() {
        assert_eq!(
            InterruptAction::for_state(&PipelineState::Preprocessing),
            InterruptAction::Cancel
        );
        assert_eq!(
            InterruptAction::for_state(&PipelineState::Requesting(HandleId(2))),
            InterruptAction::Cancel
        );
    }

    #[test]
    fn interrupt_after_cycle_exits() {
        let done = DescriptionResult::new("door ahead", TokenUsage::default()).unwrap();
        assert_eq!(
            InterruptAction::for_state(&PipelineState::Done(done)),
            InterruptAction::Exit
        );
        assert_eq!(
            InterruptAction::for_state(&PipelineState::Cancelled),
            InterruptAction::Exit
        );
        assert_eq!(
            InterruptAction::for_state(&PipelineState::Idle),
            InterruptAction::Exit
        );
    }
}
