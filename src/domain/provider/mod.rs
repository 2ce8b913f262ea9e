//! Provider domain module: endpoints, request body and response envelopes

mod envelope;
mod kind;
mod request;
mod settings;

pub use envelope::{ChatCompletionEnvelope, ResponseEnvelope, WorkersAiEnvelope};
pub use kind::{ProviderKind, ALL_PROVIDERS, GEMMA_MODEL};
pub use request::{OutboundRequest, RequestBody, TEMPERATURE};
pub use settings::{ProviderSettings, DEFAULT_MAX_TOKENS};

use crate::domain::description::DescriptionResult;
use crate::domain::error::ParseError;

/// Normalize a raw response body for the given provider
pub fn normalize(raw: &[u8], kind: ProviderKind) -> Result<DescriptionResult, ParseError> {
    kind.normalize(raw)
}
