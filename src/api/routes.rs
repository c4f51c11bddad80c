use axum::{Router, routing::get};
use std::sync::Arc;

use crate::api::handlers::{AppState, get_leaderboard, get_runs, health};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data/leaderboard.json", get(get_leaderboard))
        .route("/data/runs.json", get(get_runs))
        .route("/health", get(health))
        .with_state(state)
}
