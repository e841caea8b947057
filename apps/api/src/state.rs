use std::sync::Arc;

use crate::analysis::analyzer::RepositoryAnalyzer;
use crate::config::Config;
use crate::history::History;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn RepositoryAnalyzer>,
    /// Analysis history, backed by memory or JSON files depending on `HISTORY_DIR`.
    pub history: History,
    pub config: Config,
}
