//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use thumbnailer_core::Config;
use thumbnailer_infra::LogFormat;

use crate::constants::SERVICE_NAME;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let log_format: LogFormat = config
        .log_format()
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    thumbnailer_infra::init_telemetry(log_format, SERVICE_NAME, config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = services::initialize_services(&config).await?;
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
