//! Description result value objects

use serde::Deserialize;
use thiserror::Error;

use crate::domain::error::ParseError;

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub const fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Normalized provider answer. The text is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionResult {
    text: String,
    usage: TokenUsage,
}

impl DescriptionResult {
    /// Create a result, rejecting blank text
    pub fn new(text: impl AsRef<str>, usage: TokenUsage) -> Result<Self, ParseError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ParseError::new("provider returned an empty description"));
        }
        Ok(Self {
            text: text.to_string(),
            usage,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }
}

/// Why a description request did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request was cancelled")]
    Cancelled,
}

impl DescriptionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
