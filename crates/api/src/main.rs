use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comicgen_api::config::ServerConfig;
use comicgen_api::router::build_app_router;
use comicgen_api::state::AppState;
use comicgen_pipeline::ComicOrchestrator;
use comicgen_replicate::ReplicateApi;
use comicgen_story::StoryGenerator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comicgen_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        story = ?config.story,
        replicate = ?config.replicate,
        "Loaded server configuration",
    );

    if !config.story.has_key() {
        tracing::warn!("No OPENAI_API_KEY or GITHUB_API_KEY set; comic creation will fail");
    }
    if !config.replicate.has_token() {
        tracing::warn!("No REPLICATE_API_TOKEN set; job submission and status lookups will fail");
    }

    // --- Upstream clients ---
    let replicate = Arc::new(ReplicateApi::new(&config.replicate));
    let story = Arc::new(StoryGenerator::new(&config.story));
    let orchestrator = ComicOrchestrator::new(story, replicate.clone());

    // --- App state ---
    let addr = config.bind_addr()?;
    let config = Arc::new(config);
    let state = AppState {
        config: Arc::clone(&config),
        orchestrator,
        predictions: replicate,
    };

    // --- Router ---
    let app = build_app_router(state, &config)?;

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
