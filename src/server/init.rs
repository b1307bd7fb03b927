//! Server initialization and main run loop

use super::config::AppConfig;
use super::loader::load_config;
use super::routes::router;
use super::shutdown::wait_for_shutdown_signal;
use anyhow::{Context, Result};
use errlens_core::{AnalysisObserver, DiagnosisPipeline, RemoteDiagnosisClient};
use errlens_session::{SessionController, SharedSelection};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the diagnosis pipeline described by `config`
pub fn build_pipeline(
    config: &AppConfig,
    observer: Arc<dyn AnalysisObserver>,
) -> DiagnosisPipeline {
    let client = RemoteDiagnosisClient::new(config.remote_settings());
    DiagnosisPipeline::new(Arc::new(client)).with_observer(observer)
}

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting errlens v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    let mode = config.to_mode();
    if mode.ai_enabled && mode.credential.is_none() {
        warn!("AI analysis is enabled but no API key is configured, using heuristic results");
    }
    info!(
        ai_enabled = mode.ai_enabled,
        model = %config.llm.model,
        "Analyzer mode resolved"
    );

    let pipeline = build_pipeline(&config, Arc::new(errlens_core::TracingObserver));
    let selection = SharedSelection::new();
    let controller = Arc::new(
        SessionController::new(pipeline, mode).with_selection(Arc::new(selection.clone())),
    );

    let app = router(controller, selection);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);
    info!("Analyzer websocket available at ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("errlens shutdown complete");
    Ok(())
}
