use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::models::{AnalysisResult, Company};
use crate::analysis::repo_url::short_repo_name;

/// An `AnalysisResult` remembered under its repository URL.
/// Serialized flat, as the analysis fields plus `repoUrl` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub repo_url: String,
    pub timestamp: DateTime<Utc>,
}

const PREVIEW_TECHNOLOGIES: usize = 3;

/// Card shown in the history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub repo_url: String,
    pub repo_name: String,
    pub timestamp: DateTime<Utc>,
    pub technologies: Vec<String>,
    pub more_technologies: usize,
    pub top_company: Company,
    pub top_score: u8,
    pub summary: String,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        let techs = &entry.analysis.technologies;
        let (top_company, top_score) = entry.analysis.faang_scores.top();
        Self {
            repo_url: entry.repo_url.clone(),
            repo_name: short_repo_name(&entry.repo_url),
            timestamp: entry.timestamp,
            technologies: techs.iter().take(PREVIEW_TECHNOLOGIES).cloned().collect(),
            more_technologies: techs.len().saturating_sub(PREVIEW_TECHNOLOGIES),
            top_company,
            top_score,
            summary: entry.analysis.summary.clone(),
        }
    }
}
