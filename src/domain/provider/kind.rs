//! Provider kind value object

use std::fmt;
use std::str::FromStr;

use crate::domain::description::DescriptionResult;
use crate::domain::error::{InvalidProviderError, ParseError};

use super::envelope::{ChatCompletionEnvelope, ResponseEnvelope, WorkersAiEnvelope};

/// All available providers
pub const ALL_PROVIDERS: &[ProviderKind] = &[ProviderKind::WorkersAi, ProviderKind::OpenRouter];

/// Model served by both providers
pub const GEMMA_MODEL: &str = "google/gemma-3-12b-it";

const WORKERS_AI_MODEL_PATH: &str = "@cf/google/gemma-3-12b-it";

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Upstream inference provider, resolved once from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Cloudflare Workers AI: `{ result: { response, usage } }`
    #[default]
    WorkersAi,
    /// OpenRouter chat completions: `{ choices: [...], usage }`
    OpenRouter,
}

impl ProviderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkersAi => "workers-ai",
            Self::OpenRouter => "openrouter",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::WorkersAi => "Cloudflare Workers AI",
            Self::OpenRouter => "OpenRouter",
        }
    }

    /// Environment variable holding the credential
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::WorkersAi => "CLOUDFLARE_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Model field sent in the body. Workers AI encodes the model in the URL.
    pub const fn default_model(&self) -> Option<&'static str> {
        match self {
            Self::WorkersAi => None,
            Self::OpenRouter => Some(GEMMA_MODEL),
        }
    }

    /// Default endpoint. Workers AI needs the account id.
    pub fn default_base_url(&self, account_id: Option<&str>) -> Option<String> {
        match self {
            Self::WorkersAi => account_id.map(|id| {
                format!(
                    "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{}",
                    id, WORKERS_AI_MODEL_PATH
                )
            }),
            Self::OpenRouter => Some(OPENROUTER_URL.to_string()),
        }
    }

    /// Normalize a raw response body of this provider's envelope
    pub fn normalize(&self, raw: &[u8]) -> Result<DescriptionResult, ParseError> {
        match self {
            Self::WorkersAi => WorkersAiEnvelope::normalize(raw),
            Self::OpenRouter => ChatCompletionEnvelope::normalize(raw),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = InvalidProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workers-ai" | "workers_ai" | "cloudflare" => Ok(Self::WorkersAi),
            "openrouter" | "open-router" => Ok(Self::OpenRouter),
            _ => Err(InvalidProviderError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
