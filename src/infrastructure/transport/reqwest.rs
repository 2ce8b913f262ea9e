//! reqwest HTTP transport adapter

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{HttpResponse, HttpTransport, TransportError};
use crate::domain::provider::OutboundRequest;

/// HTTPS transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: &OutboundRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder
            .json(request.body())
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_error)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
