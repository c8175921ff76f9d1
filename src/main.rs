// Crawl service HTTP binary
//
// Serves POST /api/v1/crawl and GET /health, driving a local Chromium.
// Settings come from the environment (see ServiceSettings).

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crawl_service::{ChromiumEngine, CrawlService, ServiceSettings, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crawl_service=info,tower_http=info")),
        )
        .init();

    let settings = ServiceSettings::from_env().context("Invalid service settings")?;
    let bind_addr = settings.bind_addr;

    let engine = Arc::new(ChromiumEngine::default());
    let service = Arc::new(CrawlService::new(settings, engine));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    info!("Crawl service listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Crawl service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
