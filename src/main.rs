use std::{net::Ipv4Addr, ops::RangeInclusive, sync::Arc};

use anyhow::{Context, Result};
use rustylink::{api, config, logging, store::AliasStore};
use tokio::net::TcpListener;

const PORT_SCAN_END: u16 = 3099;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing();

    let config = config::get_config();
    let (listener, port) = bind_listener(config.server_port).await?;
    let store = AliasStore::from_config(config, config.base_url_for_port(port));
    tracing::info!(backend = %store.describe_backend(), "Alias store ready");
    let app = api::create_router(Arc::new(store));

    tracing::info!(port, "Listening on http://0.0.0.0:{port}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Bind the fixed port when configured, otherwise the first free port in the scan range.
async fn bind_listener(fixed: Option<u16>) -> Result<(TcpListener, u16)> {
    if let Some(port) = fixed {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        return Ok((listener, port));
    }

    let range: RangeInclusive<u16> = config::DEFAULT_PORT..=PORT_SCAN_END;
    for port in range.clone() {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to bind port {port}"));
            }
        }
    }

    anyhow::bail!(
        "no available port in range {}-{}",
        range.start(),
        range.end()
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
