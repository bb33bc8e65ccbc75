mod config;
mod db;
mod errors;
mod ingest;
mod llm_client;
mod mailer;
mod models;
mod pipeline;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::mailer::Mailer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProcureAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    // Vendor invitations are optional
    let mailer = match (&config.resend_api_key, &config.mail_from) {
        (Some(key), Some(from)) => Some(Mailer::new(key.clone(), from.clone())),
        _ => {
            warn!("RESEND_API_KEY or MAIL_FROM not set; vendor invitations disabled");
            None
        }
    };

    let state = AppState {
        db,
        llm: Arc::new(llm),
        mailer,
    };

    let app = build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(build_cors(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the browser frontend. Credentials are not used, so any method/header is allowed.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
