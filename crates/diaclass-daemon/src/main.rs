//! diaclass daemon
//!
//! Serves diabetes risk predictions over HTTP.

use anyhow::Context;
use clap::Parser;
use diaclass_api::create_router;
use diaclass_core::ServiceConfig;
use diaclass_engine::InferenceEngine;
use diaclass_store::BundleStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// diaclassd - diabetes risk classification service
#[derive(Parser, Debug)]
#[command(name = "diaclassd")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the API server
    #[arg(long)]
    address: Option<String>,

    /// Port for the REST API server
    #[arg(long)]
    port: Option<u16>,

    /// Path to the model bundle artifact
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Overlay command-line flags on top of the loaded configuration
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(address) = &self.address {
            config.api.address = address.clone();
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(bundle) = &self.bundle {
            config.bundle.path = bundle.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set subscriber")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    args.apply(&mut config);

    init_logging(&config.logging.level)?;

    info!("Starting diaclass daemon v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(BundleStore::from_config(&config.bundle));
    let engine = Arc::new(InferenceEngine::new(store));

    // Warm the cache; a failure here is retried by the first request
    match engine.metadata().await {
        Ok(meta) => info!(
            model_name = %meta.model_name,
            version = %meta.version,
            threshold = meta.threshold,
            "Model bundle ready"
        ),
        Err(e) => error!(
            error = %e,
            path = %config.bundle.path.display(),
            "Failed to load model bundle on startup"
        ),
    }

    let router = create_router(engine, &config.api);

    let addr: SocketAddr = format!("{}:{}", config.api.address, config.api.port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", config.api.address, config.api.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "diaclassd",
            "--port",
            "9000",
            "--bundle",
            "/srv/bundle.json",
        ]);
        let mut config = ServiceConfig::default();
        args.apply(&mut config);

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.address, "0.0.0.0");
        assert_eq!(config.bundle.path, PathBuf::from("/srv/bundle.json"));
        assert_eq!(config.logging.level, "info");
    }
}
