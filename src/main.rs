#![deny(unused)]
//! Service Finder - utterance-to-service classification daemon
//!
//! Classifies free-text utterances into a fixed service catalog by delegating
//! to an external completion oracle, with per-key request coalescing, bounded
//! oracle concurrency, and process-lifetime memoization.

mod telemetry;

use std::sync::Arc;

use finder_core::{AppConfig, Catalog, OracleClient};
use finder_dispatch::{CoalescingDispatcher, FinderServer};
use finder_oracle::CompletionClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init()?;

    tracing::info!("Starting Service Finder v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;

    // =========================================================================
    // Catalog
    // =========================================================================
    let catalog = if let Some(ref path) = config.catalog.path {
        tracing::info!(path = %path, "Loading catalog from file");
        Arc::new(Catalog::load(path).await?)
    } else {
        tracing::info!("Using built-in reference catalog");
        Arc::new(Catalog::default())
    };
    tracing::info!(services = catalog.len(), "Catalog initialized");

    // =========================================================================
    // Oracle client
    // =========================================================================
    let oracle: Arc<dyn OracleClient> = Arc::new(CompletionClient::new(&config.oracle)?);
    tracing::info!(
        model = %config.oracle.model,
        base_url = %config.oracle.base_url,
        timeout_ms = config.oracle.timeout_ms,
        "Oracle client initialized"
    );

    // =========================================================================
    // Dispatch engine
    // =========================================================================
    let dispatcher = Arc::new(CoalescingDispatcher::new(
        catalog,
        oracle,
        &config.dispatch,
        config.oracle.timeout(),
    ));
    tracing::info!(
        max_concurrency = config.dispatch.max_concurrency,
        cache_policy = ?config.dispatch.cache_policy,
        "Dispatch engine initialized"
    );

    // =========================================================================
    // Metrics + HTTP front end
    // =========================================================================
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    FinderServer::new(config.server.clone(), dispatcher)
        .with_metrics(metrics_handle)
        .run()
        .await?;

    Ok(())
}
