use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and backends in use.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let history = if state.config.history_dir.is_some() {
        "file"
    } else {
        "memory"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "devlens-api",
        "model": state.config.gemini_model,
        "history": history
    }))
}
