//! Waker server entry point.
//!
//! Initialises tracing, loads configuration from environment variables,
//! and serves the control endpoint over HTTP (or HTTPS when a certificate
//! and key are configured).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use tracing_subscriber::EnvFilter;
use waker_common::{ControllerConfig, InstanceId};

use waker_server::http::{AppState, router};
use waker_server::infra::MultipassProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("waker-server starting");

    // 2. Load configuration once; it is shared read-only from here on.
    let config: ControllerConfig =
        envy::from_env().context("failed to load configuration from environment")?;

    let instance_id = config.instance_id();
    if instance_id.is_none() {
        tracing::warn!("INSTANCE_ID is not set; control requests will fail until it is configured");
    }

    tracing::info!(
        listen_addr = %config.listen_addr,
        instance_id = instance_id.as_ref().map_or("<unset>", InstanceId::as_str),
        allowed_origins = %config.allowed_origins,
        provider = %config.multipass_bin,
        tls_enabled = config.tls_paths().is_some(),
        "configuration loaded",
    );

    // 3. Wire the provider adapter into the shared state.
    let provider = MultipassProvider::with_default_runner(
        config.multipass_bin.clone(),
        Duration::from_secs(config.provider_timeout_secs),
    );
    let state = AppState::new(provider, instance_id, &config.allowed_origins)
        .context("ALLOWED_ORIGINS is not a valid header value")?;
    let app = router(Arc::new(state));

    // 4. Bind and serve (TLS or plaintext).
    if let Some((cert_path, key_path)) = config.tls_paths() {
        tracing::info!("TLS enabled, loading cert from {}", cert_path);
        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .context("failed to load TLS certificates")?;

        tracing::info!("waker ready at https://{}/", config.listen_addr);

        axum_server::bind_rustls(config.listen_addr, tls_config)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server error")?;
    } else {
        tracing::info!("waker ready at http://{}/ (TLS disabled)", config.listen_addr);

        let listener = tokio::net::TcpListener::bind(config.listen_addr)
            .await
            .context("failed to bind TCP listener")?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
    }

    tracing::info!("waker-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
