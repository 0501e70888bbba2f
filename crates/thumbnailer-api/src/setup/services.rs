//! Wiring of the pipeline boundaries from configuration

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use thumbnailer_api_client::{ApiClient, Auth, MetadataStatusReporter, NotificationApiClient};
use thumbnailer_core::Config;
use thumbnailer_pipeline::{PipelineSettings, ThumbnailPipeline};
use thumbnailer_processing::{ImageThumbnailer, ThumbnailFormat, ThumbnailOptions};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let pipeline = build_pipeline(config).await?;

    tracing::info!(
        storage_backend = ?config.storage_backend(),
        destination_bucket = %config.destination_bucket(),
        source_bucket = ?config.source_bucket(),
        key_prefix = %config.thumbnail_key_prefix(),
        max_width = config.thumbnail_max_width(),
        max_height = config.thumbnail_max_height(),
        format = %config.thumbnail_format(),
        notifications_enabled = config.notification_api_url().is_some(),
        "Thumbnail pipeline initialized"
    );

    Ok(Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        finalized_event_types: config.finalized_event_types().to_vec(),
        pipeline_timeout: Duration::from_secs(config.pipeline_timeout_secs()),
        shutdown: CancellationToken::new(),
    }))
}

async fn build_pipeline(config: &Config) -> Result<ThumbnailPipeline> {
    let transfer = thumbnailer_storage::create_transfer(config)
        .await
        .context("Failed to initialize storage backend")?;

    let format: ThumbnailFormat = config
        .thumbnail_format()
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let deriver = ImageThumbnailer::new(ThumbnailOptions {
        max_width: config.thumbnail_max_width(),
        max_height: config.thumbnail_max_height(),
        format,
        max_source_bytes: config.max_source_size_bytes(),
    });

    let timeout = Duration::from_secs(config.metadata_api_timeout_secs());
    let auth = config.metadata_api_key().map(|key| Auth::Bearer(key.to_string()));

    let metadata_client = ApiClient::new(config.metadata_api_url(), auth.clone(), timeout)
        .context("Failed to create metadata API client")?;
    let reporter = MetadataStatusReporter::new(metadata_client, config.metadata_status_path())
        .context("Invalid metadata status path")?;

    let settings =
        PipelineSettings::new(config.destination_bucket(), config.thumbnail_key_prefix())
            .with_source_bucket(config.source_bucket().map(String::from))
            .with_max_source_bytes(config.max_source_size_bytes() as u64);

    let mut pipeline = ThumbnailPipeline::new(
        settings,
        transfer,
        Arc::new(deriver),
        Arc::new(reporter),
    );

    if let Some(url) = config.notification_api_url() {
        let client = ApiClient::new(url, auth, timeout)
            .context("Failed to create notification API client")?;
        pipeline = pipeline.with_notifier(Arc::new(NotificationApiClient::new(client)));
    }

    Ok(pipeline)
}
