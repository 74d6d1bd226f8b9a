use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Creates the router for the UI and its JSON API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Single-page UI
        .route("/", get(handlers::index_page))
        .route("/recommend", get(handlers::recommend_page))
        // JSON API
        .route("/api/titles", get(handlers::get_titles))
        .route("/api/recommend", get(handlers::get_recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
