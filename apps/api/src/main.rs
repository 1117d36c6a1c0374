mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::AnalysisOrchestrator;
use crate::config::Config;
use crate::llm_client::build_provider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values; missing keys surface below)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting automation report API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM provider. A missing credential does not stop the server:
    // every analysis falls back until the configuration is fixed.
    let provider = build_provider(&config.provider);
    if let Err(e) = &provider {
        error!("LLM provider unavailable, analyses will use the fallback dataset: {e}");
    }

    if config.analysis.summary_timeout >= config.analysis.analysis_timeout {
        warn!(
            "SUMMARY_TIMEOUT_SECS ({}s) is not shorter than ANALYSIS_TIMEOUT_SECS ({}s)",
            config.analysis.summary_timeout.as_secs(),
            config.analysis.analysis_timeout.as_secs()
        );
    }

    info!(
        "Analysis budgets: primary {}s, summary {}s, narrative {} chars",
        config.analysis.analysis_timeout.as_secs(),
        config.analysis.summary_timeout.as_secs(),
        config.analysis.summary_char_budget
    );

    let state = AppState {
        analyzer: Arc::new(AnalysisOrchestrator::new(provider, config.analysis.clone())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
