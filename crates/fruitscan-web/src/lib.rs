//! Fruitscan Web Server
//!
//! Axum-based HTTP surface for the analysis relay.

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use fruitscan_core::relay::Relay;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Largest accepted request body. Base64 inflates a photo by a third, so
/// this leaves room for images of roughly 24 MB.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze-fruit", post(routes::analyze::analyze_fruit))
        .route("/functions/v1/analyze-fruit", post(routes::analyze::analyze_fruit))
        .route("/health", get(routes::health::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(relay: Relay, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(relay);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Analysis relay listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
