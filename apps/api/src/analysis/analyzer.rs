//! Pluggable, trait-based repository analyzer.
//!
//! Default: `GeminiAnalyzer` (one inference call, lenient parse, neutral fallback).
//! `AppState` holds an `Arc<dyn RepositoryAnalyzer>` so handlers never see the backend.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::analysis::models::AnalysisResult;
use crate::analysis::parser::{parse_analysis, strip_json_fences};
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::llm_client::{preview, GeminiClient};

/// Produces an `AnalysisResult` for a repository URL.
///
/// Errors are reserved for configuration, transport and envelope failures.
/// Unparseable model text is not an error: implementations return
/// `AnalysisResult::fallback()` instead.
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    async fn analyze(&self, repo_url: &str) -> Result<AnalysisResult, AppError>;
}

pub struct GeminiAnalyzer(pub GeminiClient);

#[async_trait]
impl RepositoryAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, repo_url: &str) -> Result<AnalysisResult, AppError> {
        info!("Starting repository analysis for: {repo_url}");

        let prompt = build_analysis_prompt(repo_url);
        let text = self.0.generate_text(&prompt).await?;

        debug!(
            "Cleaned text for parsing: {}...",
            preview(strip_json_fences(&text), 200)
        );

        // Parse failures are swallowed into the neutral fallback so callers
        // always get a renderable shape.
        Ok(parse_or_fallback(&text))
    }
}

pub(crate) fn parse_or_fallback(text: &str) -> AnalysisResult {
    match parse_analysis(text) {
        Ok(result) => {
            info!("Analysis parsed successfully");
            result
        }
        Err(e) => {
            warn!("Could not parse model output, returning fallback result: {e}");
            debug!("Raw model output: {text}");
            AnalysisResult::fallback()
        }
    }
}
