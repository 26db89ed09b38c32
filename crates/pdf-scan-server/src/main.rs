use anyhow::{Context, Result};
use clap::Parser;
use pdf_scan::{ArtifactStore, TempDirStore};
use pdf_scan_server::{AppState, ServerConfig, StderrLogger, router};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    StderrLogger::new(config.log_level).init()?;

    let options = config
        .scan_options()
        .await
        .context("Failed to load scan options")?;

    let store = match &config.storage_dir {
        Some(dir) => TempDirStore::new(dir),
        None => TempDirStore::in_system_temp(),
    }
    .context("Failed to prepare storage directory")?;
    log::info!("Storing artifacts in {}", store.root().display());

    let store: Arc<dyn ArtifactStore> = Arc::new(store);
    let state = Arc::new(AppState::new(store, options, config.max_upload_bytes));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Listening on http://{}", config.bind);

    axum::serve(listener, router(state))
        .await
        .context("Server shutdown")?;
    Ok(())
}
