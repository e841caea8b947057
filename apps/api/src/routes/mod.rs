pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::history::handlers as history;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/results", post(analysis::handle_results))
        // History API
        .route(
            "/api/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route(
            "/api/history/entry",
            get(history::handle_get_entry).delete(history::handle_delete_entry),
        )
        .route("/api/history/last", get(history::handle_last_analyzed))
        .route("/api/history/export", get(history::handle_export))
        .with_state(state)
}
