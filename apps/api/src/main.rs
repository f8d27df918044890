mod config;
mod errors;
mod layout;
mod llm_client;
mod proposal;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::Assembler;
use crate::llm_client::LlmClient;
use crate::proposal::defaults::DefaultTables;
use crate::proposal::pipeline::ProposalPipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Proposal API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.model_params.timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        config.model_params.model, config.model_params.timeout
    );

    let tables = DefaultTables::canonical();
    info!("Default tables loaded (version {})", tables.version);

    let pipeline = ProposalPipeline::new(
        config.pipeline_config(),
        Arc::new(llm),
        tables,
        Assembler::new(config.issuer.clone()),
    )?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
