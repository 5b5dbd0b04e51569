//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Main routes
        .route("/", get(handlers::index))
        .route("/view/:view", get(handlers::set_view))
        .route("/settings/toggle", get(handlers::toggle_settings))
        .route("/settings/close", get(handlers::close_settings))
        .route("/settings/section/:section", get(handlers::settings_section))
        .route(
            "/engine",
            get(handlers::select_engine_query).post(handlers::select_engine_form),
        )
        .route("/theme", post(handlers::select_theme))
        // Launches
        .route("/go", get(handlers::go))
        .route("/quick/:index", get(handlers::quick_link))
        .route("/stats", get(handlers::stats))
        // API routes
        .route("/api/engines", get(handlers::api_engines))
        .route("/api/engines/:id", get(handlers::api_engine))
        .route("/api/engines/:id/status", get(handlers::api_engine_status))
        .route("/api/resolve", get(handlers::api_resolve))
        .route("/api/stats", get(handlers::api_stats))
        .route("/health", get(handlers::health))
        // Static routes
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/favicon.ico", get(handlers::favicon))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        // Add state
        .with_state(state)
}
