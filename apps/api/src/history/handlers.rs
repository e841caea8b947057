use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::report::export_file_name;
use crate::errors::AppError;
use crate::history::models::{HistoryEntry, HistorySummary};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoUrlQuery {
    pub repo_url: String,
}

/// Pulls `repoUrl` out of the query string, reporting its absence as a
/// validation error.
fn require_repo_url_query(
    query: Result<Query<RepoUrlQuery>, QueryRejection>,
) -> Result<String, AppError> {
    let missing = || AppError::Validation("Missing repoUrl query parameter".to_string());
    let Query(params) = query.map_err(|_| missing())?;
    Some(params.repo_url)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(missing)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAnalyzedResponse {
    pub repo_url: Option<String>,
}

/// GET /api/history
pub async fn handle_list_history(State(state): State<AppState>) -> Json<Vec<HistorySummary>> {
    let entries = state.history.list().await;
    Json(entries.iter().map(HistorySummary::from).collect())
}

/// GET /api/history/entry?repoUrl=
pub async fn handle_get_entry(
    State(state): State<AppState>,
    query: Result<Query<RepoUrlQuery>, QueryRejection>,
) -> Result<Json<HistoryEntry>, AppError> {
    let repo_url = require_repo_url_query(query)?;
    state
        .history
        .get(&repo_url)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for {repo_url}")))
}

/// DELETE /api/history/entry?repoUrl=
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    query: Result<Query<RepoUrlQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let repo_url = require_repo_url_query(query)?;
    if state.history.delete(&repo_url).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No analysis stored for {repo_url}")))
    }
}

/// DELETE /api/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/history/last
pub async fn handle_last_analyzed(State(state): State<AppState>) -> Json<LastAnalyzedResponse> {
    Json(LastAnalyzedResponse {
        repo_url: state.history.last().await,
    })
}

/// GET /api/history/export?repoUrl=
///
/// Downloads the stored analysis as pretty-printed JSON.
pub async fn handle_export(
    State(state): State<AppState>,
    query: Result<Query<RepoUrlQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let repo_url = require_repo_url_query(query)?;
    let entry = state
        .history
        .get(&repo_url)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for {repo_url}")))?;

    let body = serde_json::to_string_pretty(&entry.analysis)
        .map_err(|e| AppError::Internal(e.into()))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
