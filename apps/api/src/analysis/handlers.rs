//! Axum route handlers for the Analysis API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{error, info};

use crate::analysis::models::AnalysisResult;
use crate::analysis::repo_url::validate_repo_url;
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub repo_url: Option<String>,
}

/// Pulls a non-blank `repoUrl` out of the request body. A body that is not
/// JSON, or whose `repoUrl` is absent or not a string, counts as missing.
fn require_repo_url(
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let missing = || AppError::Validation("Missing repoUrl in request body".to_string());
    let Json(request) = payload.map_err(|_| missing())?;
    request
        .repo_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(missing)
}

/// POST /api/analyze
///
/// Stateless analysis of one repository. Returns the normalized result, or the
/// neutral fallback when the model's reply could not be parsed.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let repo_url = require_repo_url(payload)?;
    info!("Analyzing repository: {repo_url}");

    let analysis = state.analyzer.analyze(&repo_url).await?;

    info!("Analysis completed successfully");
    Ok(Json(analysis))
}

/// POST /api/results
///
/// Results-view flow: validate the URL, remember it as last analyzed, analyze,
/// record the outcome in history, and return the derived report. History
/// failures are logged and never cost the caller the finished analysis.
pub async fn handle_results(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let repo_url = require_repo_url(payload)?;
    let repo = validate_repo_url(&repo_url)?;
    info!("Building results for {}", repo.full_name());

    if let Err(e) = state.history.remember_last(&repo_url).await {
        error!("Error saving last analyzed repository: {e}");
    }

    let analysis = state.analyzer.analyze(&repo_url).await?;
    if let Err(e) = state.history.record(&repo_url, analysis.clone()).await {
        error!("Error saving analysis history: {e}");
    }

    Ok(Json(AnalysisReport::build(&repo_url, analysis)))
}
