mod chat;
mod classifier;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::ChatProxy;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (also loads .env)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Predictor API v{}", env!("CARGO_PKG_VERSION"));

    // Train before binding so the first request already sees the final classifier
    let classifier = build_classifier(&config).await?;
    info!("Classifier ready (mode: {:?})", classifier.mode());

    let chat = ChatProxy::new(config.openai_base_url.clone())?;
    info!(
        "Chat proxy initialized (upstream: {}, default model: {})",
        config.openai_base_url,
        chat::DEFAULT_MODEL
    );

    let state = AppState {
        classifier: Arc::new(classifier),
        chat,
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "model")]
async fn build_classifier(config: &Config) -> Result<Classifier> {
    let path = config.dataset_path.clone();
    let model =
        tokio::task::spawn_blocking(move || classifier::trainer::train_at_startup(&path)).await?;
    Ok(model.map_or_else(Classifier::heuristic, Classifier::with_model))
}

#[cfg(not(feature = "model"))]
async fn build_classifier(_config: &Config) -> Result<Classifier> {
    Ok(Classifier::heuristic())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
