//! Outbound request value objects

use std::fmt;

use serde::Serialize;

use crate::domain::prompt::{ChatMessage, Prompt};

/// Sampling temperature. Deterministic output is required.
pub const TEMPERATURE: f32 = 0.0;

/// JSON body of a description request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestBody {
    pub fn new(model: Option<String>, prompt: &Prompt, max_tokens: u32) -> Self {
        Self {
            model,
            messages: prompt.messages().to_vec(),
            max_tokens,
            temperature: TEMPERATURE,
        }
    }
}

/// One immutable HTTP request to the provider
#[derive(Clone)]
pub struct OutboundRequest {
    url: String,
    api_key: String,
    body: RequestBody,
}

impl OutboundRequest {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, body: RequestBody) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Header values sent with the request
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", "application/json".to_string()),
        ]
    }
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("model", &self.body.model)
            .field("messages", &self.body.messages.len())
            .field("max_tokens", &self.body.max_tokens)
            .finish()
    }
}
