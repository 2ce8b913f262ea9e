//! Description service: one cancellable request at a time

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::{debug, info};

use crate::domain::description::{DescriptionError, DescriptionResult};
use crate::domain::pipeline::HandleId;
use crate::domain::prompt::Prompt;
use crate::domain::provider::{OutboundRequest, ProviderSettings, RequestBody};

use super::ports::HttpTransport;

/// Longest error body kept in `RequestFailed`
const BODY_SNIPPET_CHARS: usize = 200;

/// Cancellable reference to one in-flight request
#[derive(Debug, Clone)]
pub struct InflightHandle {
    id: HandleId,
    token: CancellationToken,
}

impl InflightHandle {
    fn new(id: HandleId) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Request cancellation. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation is requested
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Sends prompts to the configured provider, tracking at most one request.
///
/// Starting a request cancels the previously tracked one before replacing
/// it. The slot is cleared whenever a request completes, fails, is
/// cancelled, or its future is dropped.
pub struct DescriptionService<T: HttpTransport> {
    transport: T,
    settings: ProviderSettings,
    next_id: AtomicU64,
    inflight: Mutex<Option<InflightHandle>>,
}

/// Clears the tracked slot when a send finishes or is dropped mid-flight
struct ReleaseOnDrop<'a, T: HttpTransport> {
    service: &'a DescriptionService<T>,
    id: HandleId,
}

impl<T: HttpTransport> Drop for ReleaseOnDrop<'_, T> {
    fn drop(&mut self) {
        self.service.release(self.id);
    }
}

impl<T: HttpTransport> DescriptionService<T> {
    /// Create a service. Settings are read once here and never change.
    pub fn new(transport: T, settings: ProviderSettings) -> Self {
        Self {
            transport,
            settings,
            next_id: AtomicU64::new(0),
            inflight: Mutex::new(None),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn slot(&self) -> MutexGuard<'_, Option<InflightHandle>> {
        // Lock is only held for swaps, poisoning carries no broken invariant
        self.inflight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Identity of the tracked request, if any
    pub fn in_flight(&self) -> Option<HandleId> {
        self.slot().as_ref().map(InflightHandle::id)
    }

    /// Register a new request, cancelling any prior one first
    pub fn begin(&self) -> InflightHandle {
        let handle = InflightHandle::new(HandleId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1));

        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            debug!(superseded = %previous.id(), by = %handle.id(), "cancelling superseded request");
            previous.cancel();
        }
        *slot = Some(handle.clone());

        handle
    }

    /// Cancel the tracked request. No-op when idle.
    pub fn cancel(&self) {
        if let Some(handle) = self.slot().take() {
            debug!(handle = %handle.id(), "cancelling request");
            handle.cancel();
        }
    }

    fn release(&self, id: HandleId) {
        let mut slot = self.slot();
        if slot.as_ref().map(InflightHandle::id) == Some(id) {
            *slot = None;
        }
    }

    /// Build the HTTP request for a prompt
    pub fn build_request(&self, prompt: &Prompt) -> OutboundRequest {
        let body = RequestBody::new(self.settings.model.clone(), prompt, self.settings.max_tokens);
        OutboundRequest::new(&self.settings.base_url, &self.settings.api_key, body)
    }

    /// Send a prompt as the new tracked request
    pub async fn send(&self, prompt: &Prompt) -> Result<DescriptionResult, DescriptionError> {
        let handle = self.begin();
        self.send_on(&handle, prompt).await
    }

    /// Send a prompt under a handle obtained from [`begin`](Self::begin)
    pub async fn send_on(
        &self,
        handle: &InflightHandle,
        prompt: &Prompt,
    ) -> Result<DescriptionResult, DescriptionError> {
        let _release = ReleaseOnDrop {
            service: self,
            id: handle.id(),
        };

        if handle.is_cancelled() {
            return Err(DescriptionError::Cancelled);
        }

        let request = self.build_request(prompt);
        let started = Instant::now();

        let response = tokio::select! {
            biased;
            _ = handle.cancelled() => {
                debug!(handle = %handle.id(), "request cancelled while outstanding");
                return Err(DescriptionError::Cancelled);
            }
            response = self.transport.post(&request) => response?,
        };

        debug!(
            handle = %handle.id(),
            status = response.status,
            bytes = response.body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "provider responded"
        );

        // A cancel that raced the response still wins
        if handle.is_cancelled() {
            return Err(DescriptionError::Cancelled);
        }

        if response.status != 200 {
            return Err(DescriptionError::RequestFailed {
                status: response.status,
                body: body_snippet(&response.body),
            });
        }

        let result = self.settings.kind.normalize(&response.body)?;
        let usage = result.usage();
        info!(
            provider = %self.settings.kind,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "description received"
        );

        Ok(result)
    }
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", cut)
    }
}
