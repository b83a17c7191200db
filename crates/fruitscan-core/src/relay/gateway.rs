//! Upstream AI gateway client.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::prompt::ChatRequest;
use crate::error::{RelayError, RelayResult};

/// Raw upstream answer: status and body, uninterpreted.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can carry one chat-completion exchange.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> RelayResult<GatewayReply>;
}

/// Gateway speaking HTTP to an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct HttpGateway {
    url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway client. Without a timeout, requests wait as long as
    /// the hosting environment allows.
    pub fn new(url: &str, timeout: Option<std::time::Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            url: url.to_string(),
            client: builder.build().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> RelayResult<GatewayReply> {
        debug!(url = %self.url, model = %request.model, "Calling AI gateway");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(RelayError::UpstreamTransport)?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if (200..300).contains(&status) => {
                return Err(RelayError::UpstreamTransport(e));
            }
            // Only a 2xx body is ever interpreted; keep the status.
            Err(e) => {
                warn!(status, cause = %e, "Failed to read AI gateway error body");
                String::new()
            }
        };

        debug!(status, bytes = body.len(), "AI gateway replied");
        Ok(GatewayReply { status, body })
    }
}
