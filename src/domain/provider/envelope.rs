//! Provider response envelopes

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::description::{DescriptionResult, TokenUsage};
use crate::domain::error::ParseError;

/// An upstream response shape that carries one description and its usage
pub trait ResponseEnvelope: DeserializeOwned {
    /// Pull the description out of the decoded envelope
    fn into_result(self) -> Result<DescriptionResult, ParseError>;

    /// Decode raw bytes and normalize
    fn normalize(raw: &[u8]) -> Result<DescriptionResult, ParseError> {
        let envelope: Self =
            serde_json::from_slice(raw).map_err(|e| ParseError::new(e.to_string()))?;
        envelope.into_result()
    }
}

// Shape A: Workers AI

#[derive(Debug, Deserialize)]
pub struct WorkersAiEnvelope {
    result: WorkersAiResult,
}

#[derive(Debug, Deserialize)]
struct WorkersAiResult {
    response: String,
    usage: TokenUsage,
}

impl ResponseEnvelope for WorkersAiEnvelope {
    fn into_result(self) -> Result<DescriptionResult, ParseError> {
        DescriptionResult::new(self.result.response, self.result.usage)
    }
}

// Shape B: chat completions

#[derive(Debug, Deserialize)]
pub struct ChatCompletionEnvelope {
    choices: Vec<Choice>,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ResponseEnvelope for ChatCompletionEnvelope {
    fn into_result(self) -> Result<DescriptionResult, ParseError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::new("response has no choices"))?
            .message
            .content
            .unwrap_or_default();
        DescriptionResult::new(content, self.usage)
    }
}
