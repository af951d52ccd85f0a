//! Axum router configuration with middleware.
//!
//! Pages at `/` and `/chat/{project_id}/` (with or without the trailing
//! slash), the live channel at `/ws`, static assets under `/static`.
//! Middleware: request tracing.

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    if !state.static_dir.exists() {
        tracing::warn!(
            path = %state.static_dir.display(),
            "Static directory not found; the live chat script will not load"
        );
    }

    Router::new()
        .route(
            "/",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route(
            "/chat/{project_id}",
            get(handlers::chat::show_chat).post(handlers::chat::submit_chat),
        )
        .route(
            "/chat/{project_id}/",
            get(handlers::chat::show_chat).post(handlers::chat::submit_chat),
        )
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
