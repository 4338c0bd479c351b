mod config;
mod errors;
mod intake;
mod interview;
mod llm_client;
mod routes;
mod speech;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::provider::LlmInterviewAi;
use crate::interview::store::InterviewStore;
use crate::interview::timer::Countdown;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::speech::SimulatedSpeaker;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CrispHire API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and the AI capability backend
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!(
        "LLM client initialized (default model: {})",
        config.default_model
    );

    // In-memory interview store: roster + single active session
    let store = InterviewStore::new(config.default_model.clone());

    // Build app state
    let state = AppState {
        store,
        ai: Arc::new(LlmInterviewAi::new(llm)),
        speaker: Arc::new(SimulatedSpeaker),
        countdown: Arc::new(Countdown::new()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
