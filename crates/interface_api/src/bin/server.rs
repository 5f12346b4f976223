//! Pharmacy Claims - API Server Binary
//!
//! Opens the store, seeds it from the catalog and batch directories, then
//! serves the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin pharmacy-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_AUTH_TOKEN=secret cargo run --bin pharmacy-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_AUTH_TOKEN` - Bearer token for the claims routes (required)
//! * `API_DATABASE_PATH` - SQLite file (default: ./data/pharmacy.db)
//! * `API_PHARMACIES_CSV_PATH` - Pharmacy catalog (default: pharmacies.csv)
//! * `API_CLAIMS_DATA_PATH` - Claim batch directory (default: ./data/claims)
//! * `API_REVERTS_DATA_PATH` - Revert batch directory (default: ./data/reverts)
//! * `API_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `API_LOG_DIR` - Directory for app.log (default: logs)
//!
//! Prometheus metrics are served without auth on `GET /metrics`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use domain_claims::{ingestion, ClaimService, ClaimStorePort};
use infra_db::{create_pool, run_migrations, DatabaseConfig, SqliteClaimsAdapter};
use interface_api::{config::ApiConfig, create_router, logging::init_logging, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {}", config.log_dir.display()))?;
    let _log_guard = init_logging(&config.log_level, &config.log_dir);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Pharmacy Claims API Server"
    );

    if !config.auth_enabled() {
        tracing::warn!("API_AUTH_TOKEN is not set; every claims request will be rejected");
    }

    prepare_directories(&config)?;

    let pool = create_pool(DatabaseConfig::file(&config.database_path))
        .await
        .context("Failed to open database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database schema")?;

    let store: Arc<dyn ClaimStorePort> = Arc::new(SqliteClaimsAdapter::new(pool.clone()));
    seed_store(store.as_ref(), &config).await;

    let app = create_router(ClaimService::new(store), config.clone());
    spawn_metrics_upkeep();

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the database parent directory and both batch directories
fn prepare_directories(config: &ApiConfig) -> anyhow::Result<()> {
    if let Some(parent) = config.database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    create_dir(&config.claims_data_path)?;
    create_dir(&config.reverts_data_path)?;
    Ok(())
}

fn create_dir(path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Loads the catalog, then claims, then reverts
///
/// A failed step is logged and the next one still runs.
async fn seed_store(store: &dyn ClaimStorePort, config: &ApiConfig) {
    match ingestion::load_pharmacies_from_csv(store, &config.pharmacies_csv_path).await {
        Ok(report) => tracing::info!(loaded = report.loaded, skipped = report.skipped, "Pharmacy catalog ready"),
        Err(e) => tracing::error!(error = %e, "Error loading pharmacies from CSV"),
    }

    match ingestion::load_claims_from_dir(store, &config.claims_data_path).await {
        Ok(report) => tracing::info!(
            files = report.files_loaded,
            skipped = report.files_skipped,
            records = report.records_saved,
            "Claims loading completed"
        ),
        Err(e) => tracing::error!(error = %e, "Error loading and saving claims"),
    }

    match ingestion::load_reverts_from_dir(store, &config.reverts_data_path).await {
        Ok(report) => tracing::info!(
            files = report.files_loaded,
            skipped = report.files_skipped,
            records = report.records_saved,
            "Reverts loading completed"
        ),
        Err(e) => tracing::error!(error = %e, "Error loading and saving reverts"),
    }
}

/// Periodically drains histogram samples so `/metrics` stays bounded
fn spawn_metrics_upkeep() {
    let handle = metrics::recorder_handle();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(metrics::UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    });
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
