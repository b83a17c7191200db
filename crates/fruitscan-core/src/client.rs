//! Relay client.
//!
//! Sends one image to a running relay per call and maps its status codes to
//! results or user-facing advisories. Calls are tagged with increasing
//! tokens so a caller juggling overlapping requests can drop stale answers.

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analysis::{AnalysisRequest, AnalysisResult};
use crate::error::{ClientError, ClientResult};

/// Default relay URL.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3040";

/// Environment variable overriding the relay URL.
pub const RELAY_URL_ENV: &str = "FRUITSCAN_RELAY_URL";

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/analyze-fruit";

const GENERIC_FAILURE: &str = "Failed to analyze image";

/// Identifies one analysis call. Later calls carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out request tokens and remembers the newest one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token newer than every token issued before.
    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` belongs to the most recent call.
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// A relay answer together with the token of the call that produced it.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub token: RequestToken,
    pub result: AnalysisResult,
}

/// HTTP client for the analysis relay.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    sequencer: Arc<RequestSequencer>,
}

impl RelayClient {
    /// Create a client for the relay at `base_url`.
    pub fn new(base_url: &str) -> Self {
        debug!(base_url = %base_url, "RelayClient initialized");
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            sequencer: Arc::new(RequestSequencer::new()),
        }
    }

    /// Send `Authorization: Bearer <token>` with every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    /// Whether a response tagged with `token` is still the current one.
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.sequencer.is_latest(token)
    }

    /// Analyze one image (raw base64 or data URL).
    pub async fn analyze(&self, image: &str) -> ClientResult<Analyzed> {
        let token = self.sequencer.next();
        let url = self.endpoint();
        debug!(url = %url, ?token, bytes = image.len(), "Sending image to relay");

        let mut request = self.client.post(&url).json(&AnalysisRequest::new(image));
        if let Some(bearer) = &self.token {
            request = request.bearer_auth(bearer);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = interpret_response(status, &body)?;
        if !self.is_latest(token) {
            debug!(?token, "Relay answered a superseded request");
        }
        Ok(Analyzed { token, result })
    }
}

/// Map a relay status and body to a result or client error.
pub fn interpret_response(status: u16, body: &str) -> ClientResult<AnalysisResult> {
    match status {
        429 => {
            warn!("Relay reported rate limiting");
            Err(ClientError::RateLimited)
        }
        402 => {
            warn!("Relay reported the service unavailable");
            Err(ClientError::ServiceUnavailable)
        }
        200..=299 => Ok(serde_json::from_str(body)?),
        _ => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(status, message = %message, "Relay returned an error");
            Err(ClientError::Relay { status, message })
        }
    }
}
