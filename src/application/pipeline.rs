//! Capture-to-description pipeline use case

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::config::DEFAULT_LOCALE;
use crate::domain::description::DescriptionError;
use crate::domain::error::EncodingError;
use crate::domain::image::{CapturedImage, PreprocessOptions};
use crate::domain::language;
use crate::domain::pipeline::{PipelineSession, PipelineState};
use crate::domain::prompt::{Prompt, SystemInstruction};

use super::description::DescriptionService;
use super::ports::{HttpTransport, ImagePreprocessor};

/// Callback receiving every applied state transition, in order
pub type StateObserver = Arc<dyn Fn(&PipelineState) + Send + Sync>;

/// Per-controller settings fixed at construction
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Locale used to pick the response language
    pub locale: String,
    /// Downscale and JPEG quality factors
    pub preprocess: PreprocessOptions,
    /// System instruction template
    pub instruction: SystemInstruction,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            preprocess: PreprocessOptions::default(),
            instruction: SystemInstruction::canonical(),
        }
    }
}

/// Sequences preprocess, request and outcome for each capture.
///
/// At most one cycle is live. A capture arriving while a cycle is active
/// cancels it first, and anything the abandoned cycle produces later is
/// dropped without touching the state.
pub struct PipelineController<P, T>
where
    P: ImagePreprocessor,
    T: HttpTransport,
{
    preprocessor: Arc<P>,
    service: DescriptionService<T>,
    options: PipelineOptions,
    session: Mutex<PipelineSession>,
    observer: Option<StateObserver>,
}

impl<P, T> PipelineController<P, T>
where
    P: ImagePreprocessor,
    T: HttpTransport,
{
    pub fn new(preprocessor: P, service: DescriptionService<T>, options: PipelineOptions) -> Self {
        Self {
            preprocessor: Arc::new(preprocessor),
            service,
            options,
            session: Mutex::new(PipelineSession::new()),
            observer: None,
        }
    }

    /// Attach the state observer
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn service(&self) -> &DescriptionService<T> {
        &self.service
    }

    /// Current state snapshot
    pub async fn state(&self) -> PipelineState {
        self.session.lock().await.state().clone()
    }

    fn publish(&self, state: &PipelineState) {
        debug!(state = %state.phase(), "pipeline transition");
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }

    /// Abandon the active cycle. No-op when nothing is running.
    pub async fn cancel(&self) {
        let mut session = self.session.lock().await;
        self.cancel_locked(&mut session);
    }

    fn cancel_locked(&self, session: &mut PipelineSession) {
        match session.cancel() {
            Ok(handle) => {
                if handle.is_some() {
                    self.service.cancel();
                }
                self.publish(session.state());
            }
            Err(e) => debug!(reason = %e, "nothing to cancel"),
        }
    }

    /// Run one full cycle for a capture.
    ///
    /// Returns the terminal state this cycle reached, or `Cancelled` if it
    /// was cancelled or superseded before finishing.
    pub async fn capture_received(&self, image: CapturedImage) -> PipelineState {
        let cycle = {
            let mut session = self.session.lock().await;
            if session.is_active() {
                self.cancel_locked(&mut session);
            }
            match session.begin_capture() {
                Ok(cycle) => {
                    self.publish(session.state());
                    cycle
                }
                Err(e) => {
                    warn!(reason = %e, "capture rejected");
                    return PipelineState::Cancelled;
                }
            }
        };

        let original_size = image.byte_size();
        let preprocessor = Arc::clone(&self.preprocessor);
        let options = self.options.preprocess;
        let encoded = tokio::task::spawn_blocking(move || preprocessor.preprocess(&image, options))
            .await
            .unwrap_or_else(|e| Err(EncodingError::Worker(e.to_string())));

        let payload = match encoded {
            Ok(payload) => payload,
            Err(error) => {
                let mut session = self.session.lock().await;
                warn!(cycle = cycle.0, error = %error, "preprocessing failed");
                return match session.fail_encoding(cycle, error) {
                    Ok(()) => {
                        self.publish(session.state());
                        session.state().clone()
                    }
                    Err(_) => {
                        debug!(cycle = cycle.0, "discarding failure of abandoned cycle");
                        PipelineState::Cancelled
                    }
                };
            }
        };

        debug!(
            cycle = cycle.0,
            original_bytes = original_size,
            encoded_bytes = payload.byte_size(),
            encoded_size = %payload.human_readable_size(),
            width = payload.width(),
            height = payload.height(),
            "capture preprocessed"
        );

        let language = language::resolve(&self.options.locale);
        let prompt = Prompt::build_with(&self.options.instruction, language, &payload);

        let handle = {
            let mut session = self.session.lock().await;
            if !session.awaiting_payload(cycle) {
                debug!(cycle = cycle.0, "discarding payload of abandoned cycle");
                return PipelineState::Cancelled;
            }
            let handle = self.service.begin();
            if let Err(e) = session.start_requesting(cycle, handle.id()) {
                warn!(reason = %e, "could not start request");
                self.service.cancel();
                return PipelineState::Cancelled;
            }
            self.publish(session.state());
            handle
        };

        let outcome = self.service.send_on(&handle, &prompt).await;
        let was_cancelled = outcome.as_ref().is_err_and(DescriptionError::is_cancelled);
        if let Err(e) = &outcome {
            if !was_cancelled {
                warn!(handle = %handle.id(), error = %e, "description request failed");
            }
        }

        let mut session = self.session.lock().await;
        match session.finish(handle.id(), outcome) {
            Ok(()) => {
                self.publish(session.state());
                session.state().clone()
            }
            Err(_) => {
                if !was_cancelled {
                    warn!(handle = %handle.id(), "discarding late result of superseded request");
                }
                PipelineState::Cancelled
            }
        }
    }
}
