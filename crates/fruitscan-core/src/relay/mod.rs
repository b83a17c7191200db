//! Analysis relay.
//!
//! Stateless handler that forwards one fruit image to the AI gateway and
//! turns the model's free-text answer into a diagnosis, a recognized
//! "no fruit" result, or a structured error with an HTTP status.

pub mod extract;
pub mod gateway;
pub mod mock;
pub mod prompt;

use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::analysis::{AnalysisRequest, Diagnosis};
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};

pub use extract::{extract_json_object, normalize_image};
pub use gateway::{GatewayReply, HttpGateway, ModelGateway};

/// What one relay invocation produced.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Parsed upstream object, returned verbatim.
    Diagnosis(Map<String, Value>),
    /// Upstream object carrying `error`: the model saw no fruit.
    NotAFruit(Map<String, Value>),
    Failed(RelayError),
}

/// Status and JSON body, ready to be written to the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Value,
}

impl RelayOutcome {
    pub fn status(&self) -> u16 {
        match self {
            Self::Diagnosis(_) | Self::NotAFruit(_) => 200,
            Self::Failed(e) => e.status(),
        }
    }

    pub fn into_response(self) -> RelayResponse {
        let status = self.status();
        let body = match self {
            Self::Diagnosis(map) | Self::NotAFruit(map) => Value::Object(map),
            Self::Failed(e) => json!({ "error": e.to_string() }),
        };
        RelayResponse { status, body }
    }
}

/// The relay: injected configuration plus an upstream gateway.
#[derive(Clone)]
pub struct Relay {
    config: Arc<RelayConfig>,
    gateway: Arc<dyn ModelGateway>,
}

impl Relay {
    pub fn new(config: Arc<RelayConfig>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self { config, gateway }
    }

    /// Relay talking HTTP to the configured gateway URL.
    pub fn with_http_gateway(config: RelayConfig) -> Self {
        let gateway = HttpGateway::new(&config.gateway_url, config.upstream_timeout());
        Self::new(Arc::new(config), Arc::new(gateway))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Handle one request end to end.
    pub async fn handle(&self, request: &AnalysisRequest) -> RelayResponse {
        let outcome = match self.analyze(request).await {
            Ok(outcome) => outcome,
            Err(e) => RelayOutcome::Failed(e),
        };
        if let RelayOutcome::Failed(e) = &outcome {
            debug!(kind = ?e.kind(), status = e.status(), error = %e, "Analysis failed");
        }
        outcome.into_response()
    }

    async fn analyze(&self, request: &AnalysisRequest) -> RelayResult<RelayOutcome> {
        let image = request.image().ok_or(RelayError::InvalidInput)?;
        let api_key = self.config.api_key().ok_or_else(|| {
            error!("AI gateway credential is not configured");
            RelayError::Misconfigured
        })?;

        let image_url = normalize_image(image);
        let chat = prompt::build_request(&self.config.model, &image_url);
        debug!(model = %self.config.model, image_bytes = image_url.len(), "Forwarding image to AI gateway");

        let reply = self.gateway.complete(api_key, &chat).await.map_err(|e| {
            error!(error = %e, cause = ?std::error::Error::source(&e), "AI gateway unreachable");
            e
        })?;

        let content = interpret_reply(&reply)?;
        self.classify(&content)
    }

    fn classify(&self, content: &str) -> RelayResult<RelayOutcome> {
        let object = extract_json_object(content).map_err(|e| {
            error!(raw = %content, "Failed to parse AI response");
            e
        })?;

        if object.contains_key("error") {
            debug!("Model reported no recognizable fruit");
            return Ok(RelayOutcome::NotAFruit(object));
        }

        if self.config.strict_schema {
            let diagnosis: Diagnosis = serde_json::from_value(Value::Object(object.clone()))
                .map_err(|e| {
                    error!(error = %e, raw = %content, "AI response does not match diagnosis schema");
                    RelayError::MalformedUpstreamPayload
                })?;
            diagnosis.validate().map_err(|reason| {
                error!(reason = %reason, raw = %content, "AI response out of range");
                RelayError::MalformedUpstreamPayload
            })?;
        }

        Ok(RelayOutcome::Diagnosis(object))
    }
}

/// Map the upstream status and envelope to the model's text content.
///
/// Rate-limit and payment statuses short-circuit before the body is read.
pub fn interpret_reply(reply: &GatewayReply) -> RelayResult<String> {
    match reply.status {
        429 => {
            warn!("AI gateway rate limited the request");
            return Err(RelayError::RateLimited);
        }
        402 => {
            warn!("AI gateway reported payment required");
            return Err(RelayError::UpstreamUnavailable);
        }
        _ if !reply.is_success() => {
            error!(status = reply.status, body = %reply.body, "AI gateway error");
            return Err(RelayError::UpstreamStatus(reply.status));
        }
        _ => {}
    }

    let envelope: prompt::ChatResponse = serde_json::from_str(&reply.body).map_err(|e| {
        error!(error = %e, "AI gateway returned an unreadable envelope");
        RelayError::EmptyUpstreamResponse
    })?;

    envelope
        .first_content()
        .map(str::to_string)
        .ok_or(RelayError::EmptyUpstreamResponse)
}

#[cfg(test)]
mod tests {
    use super::mock::MockGateway;
    use super::*;
    use crate::analysis::AnalysisResult;

    const SCENARIO_C: &str = "```json\n{\"fruitType\":\"Apple\",\"isHealthy\":true,\"disease\":{\"name\":\"None\",\"severity\":\"Healthy\",\"confidence\":98,\"description\":\"No visible symptoms\"},\"treatment\":{\"immediate\":[],\"prevention\":[],\"chemicals\":[]},\"additionalNotes\":\"\"}\n```";

    fn config() -> RelayConfig {
        RelayConfig {
            api_key: Some("test-key".into()),
            ..RelayConfig::default()
        }
    }

    fn relay(mock: Arc<MockGateway>) -> Relay {
        Relay::new(Arc::new(config()), mock)
    }

    #[tokio::test]
    async fn test_empty_image_is_rejected_without_upstream_call() {
        let mock = Arc::new(MockGateway::with_content(SCENARIO_C));
        let relay = relay(mock.clone());

        let resp = relay.handle(&AnalysisRequest::new("")).await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, json!({"error": "No image provided"}));

        let resp = relay.handle(&AnalysisRequest::default()).await;
        assert_eq!(resp.status, 400);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let mock = Arc::new(MockGateway::with_content(SCENARIO_C));
        let relay = Relay::new(Arc::new(RelayConfig::default()), mock.clone());

        let resp = relay.handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["error"], "AI_GATEWAY_API_KEY is not configured");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_scenario_c_fenced_success() {
        let mock = Arc::new(MockGateway::with_content(SCENARIO_C));
        let relay = relay(mock.clone());

        let resp = relay.handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!({
                "fruitType": "Apple",
                "isHealthy": true,
                "disease": {"name": "None", "severity": "Healthy", "confidence": 98, "description": "No visible symptoms"},
                "treatment": {"immediate": [], "prevention": [], "chemicals": []},
                "additionalNotes": ""
            })
        );
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.last_image().as_deref(), Some("data:image/jpeg;base64,QUJD"));

        let result: AnalysisResult = serde_json::from_value(resp.body).unwrap();
        let d = result.diagnosis().unwrap();
        assert!((0.0..=100.0).contains(&d.disease.confidence));
    }

    #[tokio::test]
    async fn test_data_uri_forwarded_unchanged() {
        let mock = Arc::new(MockGateway::with_content(SCENARIO_C));
        let relay = relay(mock.clone());

        relay
            .handle(&AnalysisRequest::new("data:image/png;base64,iVBOR"))
            .await;
        assert_eq!(mock.last_image().as_deref(), Some("data:image/png;base64,iVBOR"));
    }

    #[tokio::test]
    async fn test_scenario_b_rate_limited() {
        // A parseable body proves the 429 path never reaches extraction.
        let envelope = json!({"choices": [{"message": {"content": SCENARIO_C}}]}).to_string();
        let mock = Arc::new(MockGateway::with_status(429, &envelope));
        let relay = relay(mock.clone());

        let resp = relay.handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 429);
        assert_eq!(
            resp.body,
            json!({"error": "Rate limit exceeded. Please try again in a moment."})
        );
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_payment_required() {
        let envelope = json!({"choices": [{"message": {"content": SCENARIO_C}}]}).to_string();
        let mock = Arc::new(MockGateway::with_status(402, &envelope));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 402);
        assert_eq!(
            resp.body,
            json!({"error": "Service temporarily unavailable. Please try again later."})
        );
    }

    #[tokio::test]
    async fn test_other_upstream_status() {
        let mock = Arc::new(MockGateway::with_status(503, "upstream exploded: secret details"));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"error": "AI gateway error: 503"}));
    }

    #[tokio::test]
    async fn test_empty_upstream_content() {
        let mock = Arc::new(MockGateway::with_status(200, r#"{"choices":[]}"#));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"error": "No response from AI"}));

        let mock = Arc::new(MockGateway::with_status(200, "<html>not json</html>"));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"error": "No response from AI"}));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_not_echoed() {
        let raw = "Sorry, I cannot help with that. Internal note: do not leak.";
        let mock = Arc::new(MockGateway::with_content(raw));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"error": "Failed to parse analysis results"}));
        assert!(!resp.body.to_string().contains("do not leak"));
    }

    #[tokio::test]
    async fn test_recognized_non_fruit_passes_through() {
        let content = "{\"error\": \"Unable to identify fruit in the image. Please upload a clear image of a fruit.\"}";
        let mock = Arc::new(MockGateway::with_content(content));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!({"error": "Unable to identify fruit in the image. Please upload a clear image of a fruit."})
        );
    }

    #[tokio::test]
    async fn test_lenient_mode_passes_partial_object() {
        let mock = Arc::new(MockGateway::with_content(r#"{"fruitType": "Pear"}"#));
        let resp = relay(mock).handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({"fruitType": "Pear"}));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_partial_object() {
        let mock = Arc::new(MockGateway::with_content(r#"{"fruitType": "Pear"}"#));
        let strict = RelayConfig {
            strict_schema: true,
            ..config()
        };
        let relay = Relay::new(Arc::new(strict), mock);
        let resp = relay.handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"error": "Failed to parse analysis results"}));
    }

    #[tokio::test]
    async fn test_strict_mode_accepts_valid_diagnosis() {
        let mock = Arc::new(MockGateway::with_content(SCENARIO_C));
        let strict = RelayConfig {
            strict_schema: true,
            ..config()
        };
        let relay = Relay::new(Arc::new(strict), mock);
        let resp = relay.handle(&AnalysisRequest::new("QUJD")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["fruitType"], "Apple");
    }

    #[test]
    fn test_interpret_reply_statuses() {
        use crate::error::ErrorKind;

        let kind = |status: u16| {
            interpret_reply(&GatewayReply::new(status, "{}"))
                .unwrap_err()
                .kind()
        };
        assert_eq!(kind(429), ErrorKind::RateLimited);
        assert_eq!(kind(402), ErrorKind::UpstreamUnavailable);
        assert_eq!(kind(401), ErrorKind::UpstreamError);
        assert_eq!(kind(500), ErrorKind::UpstreamError);
        assert_eq!(kind(200), ErrorKind::EmptyUpstreamResponse);
    }
}
