mod analysis;
mod config;
mod errors;
mod improvement;
mod llm_client;
mod matching;
mod models;
mod parsing;
mod routes;
mod state;
mod workflow;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::improvement::generator::{
    LlmSuggestionGenerator, RuleBasedSuggestionGenerator, SuggestionGenerator,
};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Agent API v{}", env!("CARGO_PKG_VERSION"));

    // Suggestion generator (rule-based by default; swap via ENABLE_LLM_SUGGESTIONS)
    let suggestion_generator = build_suggestion_generator(&config)?;
    info!("Suggestion generator: {}", suggestion_generator.backend());

    let state = AppState {
        config: config.clone(),
        suggestion_generator,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_suggestion_generator(config: &Config) -> Result<Arc<dyn SuggestionGenerator>> {
    match (config.enable_llm_suggestions, &config.anthropic_api_key) {
        (true, Some(api_key)) => {
            let llm = LlmClient::new(api_key.clone(), config.anthropic_api_url.clone())
                .context("Failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmSuggestionGenerator::new(llm)))
        }
        _ => Ok(Arc::new(RuleBasedSuggestionGenerator)),
    }
}
