//! HTTP transport port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::description::DescriptionError;
use crate::domain::provider::OutboundRequest;

/// Network-level failures
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<TransportError> for DescriptionError {
    fn from(err: TransportError) -> Self {
        DescriptionError::Transport(err.to_string())
    }
}

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Port for posting a description request
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST the request and return whatever the server answered.
    ///
    /// Non-2xx statuses are not errors at this level. Dropping the returned
    /// future aborts the exchange.
    async fn post(&self, request: &OutboundRequest) -> Result<HttpResponse, TransportError>;
}
