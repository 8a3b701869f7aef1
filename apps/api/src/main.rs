mod config;
mod enrichment;
mod errors;
mod llm_client;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enrichment::acquisition::{GitHubApiClient, PageFetcher};
use crate::enrichment::orchestrator::Orchestrator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GitTalent API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (the generation capability)
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize acquisition strategies
    let pages = PageFetcher::new(config.fetch_timeout, config.max_content_length)
        .context("Failed to build page fetcher HTTP client")?;
    let github = GitHubApiClient::new(&config.github_api_base_url, config.fetch_timeout)
        .context("Failed to build GitHub API HTTP client")?;
    info!(
        "Acquisition initialized (profile host: {}, API: {}, timeout: {:?}, max content: {} chars)",
        config.profile_host,
        config.github_api_base_url,
        config.fetch_timeout,
        config.max_content_length
    );
    info!(
        "Content validator: min length {} chars, {} login phrases, {} error phrases, {} upstream signatures",
        config.heuristics.min_content_length,
        config.heuristics.login_phrases.len(),
        config.heuristics.error_phrases.len(),
        config.heuristics.malformed_signatures.len()
    );

    let orchestrator = Orchestrator::new(
        Arc::new(llm),
        Arc::new(pages),
        Arc::new(github),
        config.heuristics.clone(),
        config.profile_host.clone(),
    );

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the dashboard origin once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
