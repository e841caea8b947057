mod analysis;
mod config;
mod errors;
mod history;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::GeminiAnalyzer;
use crate::config::Config;
use crate::history::store::{HistoryStore, JsonFileHistoryStore, MemoryHistoryStore};
use crate::history::History;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DevLens API v{}", env!("CARGO_PKG_VERSION"));

    // Fail fast on a missing credential instead of at first request
    config.validate()?;

    // Initialize LLM client
    let llm = GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.gemini_api_base,
        &config.gemini_model,
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize history store
    let store: Arc<dyn HistoryStore> = match &config.history_dir {
        Some(dir) => Arc::new(JsonFileHistoryStore::open(dir).await?),
        None => {
            info!("HISTORY_DIR not set, keeping analysis history in memory");
            Arc::new(MemoryHistoryStore::new())
        }
    };

    let state = AppState {
        analyzer: Arc::new(GeminiAnalyzer(llm)),
        history: History::new(store),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // front-end is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
