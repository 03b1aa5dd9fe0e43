pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::chat::handlers::handle_chat;
use crate::classifier::handlers::handle_predict;
use crate::state::AppState;

/// Any origin, method and header. `very_permissive` mirrors the request's
/// origin and headers so credentials stay allowed.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/predict",
            post(handle_predict).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/chat", post(handle_chat))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
}
