mod config;
mod errors;
mod models;
mod ranking;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ranking::lexical::LexicalScorer;
use crate::ranking::ranker::RankingService;
use crate::ranking::semantic::{build_embedder, SemanticScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Ranker v{}", env!("CARGO_PKG_VERSION"));

    // Scoring backends are built once here and shared by every request
    let lexical = LexicalScorer::with_defaults().context("Failed to build TF-IDF scorer")?;
    info!("Lexical scorer initialized (ngram range {:?})", lexical.ngram_range());

    let embedder = build_embedder(
        &config.embedding_backend,
        config.embedding_dimension,
        &config.embedding_model,
    )
    .context("Failed to build embedding backend")?;
    info!(
        "Embedding backend initialized: {} ({} dims)",
        embedder.name(),
        embedder.dimension()
    );

    let ranker = RankingService::new(
        lexical,
        SemanticScorer::new(embedder),
        config.default_weights,
    )
    .context("Invalid default ranking weights")?;
    info!("Default ranking weights: {:?}", ranker.default_weights());

    // Build app state
    let state = AppState {
        ranker: Arc::new(ranker),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
