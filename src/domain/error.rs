//! Domain error types

use thiserror::Error;

/// Error when an image cannot be turned into an upload payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Invalid preprocessing options: {0}")]
    InvalidOptions(String),

    #[error("Failed to decode captured image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Re-encoded image ({encoded} bytes) is not smaller than the capture ({original} bytes)")]
    NotReduced { original: usize, encoded: usize },

    #[error("Image worker failed: {0}")]
    Worker(String),
}

/// Error when a provider response does not match the expected envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse provider response: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error when an invalid provider name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid provider: \"{input}\". Valid providers are: workers-ai, openrouter")]
pub struct InvalidProviderError {
    pub input: String,
}

/// Error when a system instruction template lacks the language placeholder
#[derive(Debug, Clone, Error)]
#[error("Prompt template must contain the {{language}} placeholder")]
pub struct InvalidTemplateError;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),

    #[error("Missing API key. Set {env_var} or configure via 'iris config set api_key <key>'")]
    MissingCredential { env_var: &'static str },

    #[error("Missing Cloudflare account id. Set CLOUDFLARE_ACCOUNT_ID, 'account_id' or 'base_url'")]
    MissingAccountId,
}
