pub mod health;

use axum::{routing::get, Router};

use crate::matching::handlers;
use crate::state::AppState;
use crate::stats::handlers::handle_stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/match", get(handlers::handle_match))
        .route("/api/jobs", get(handlers::handle_jobs))
        .route("/api/stats", get(handle_stats))
        .with_state(state)
}
