pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Export API
        .route(
            "/api/v1/exports",
            get(handlers::handle_status).post(handlers::handle_export),
        )
        .route("/api/v1/exports/:filename", get(handlers::handle_download))
        // Dry-run pagination for previews
        .route("/api/v1/layout", post(handlers::handle_layout))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
