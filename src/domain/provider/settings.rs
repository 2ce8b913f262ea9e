//! Resolved provider settings

use std::fmt;

use super::kind::ProviderKind;

/// Default cap on generated tokens
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Everything needed to talk to one provider.
/// Read once at startup and never modified.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: String,
    pub model: Option<String>,
    pub max_tokens: u32,
}

impl ProviderSettings {
    /// Settings with the provider's default model and token cap
    pub fn new(kind: ProviderKind, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: kind.default_model().map(str::to_string),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
