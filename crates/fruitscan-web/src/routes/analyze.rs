//! Analysis route handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use fruitscan_core::analysis::AnalysisRequest;
use serde_json::{json, Value};
use tracing::{debug, warn, Instrument};

use crate::state::AppState;

/// POST /analyze-fruit - Forward one image to the relay.
pub async fn analyze_fruit(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    if let Some(expected) = state.relay_token() {
        if !bearer_matches(&headers, expected) {
            warn!("Rejected analysis request with missing or wrong bearer token");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            );
        }
    }

    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            let status = rejection.status();
            debug!(%status, error = %rejection, "Unreadable analysis request body");
            let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                "Image too large"
            } else {
                "Invalid request body"
            };
            return (status, Json(json!({ "error": message })));
        }
    };

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);
    let response = state.relay.handle(&request).instrument(span).await;

    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body))
}

fn bearer_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim() == expected)
        .unwrap_or(false)
}
