use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use thumbnailer_core::{
    AssetIdentity, LogLevel, NoOpNotifier, OriginFilter, OutcomeNotifier, PipelineError,
    ProcessingOutcome, StatusReporter, StorageNotification,
};
use thumbnailer_processing::ThumbnailDeriver;
use thumbnailer_storage::{thumbnail_key, AssetTransfer};
use tracing::Instrument;

use crate::disposition::{Disposition, Stage};
use crate::signal::InvocationSignal;

/// Where thumbnails are written, and which notifications are worth reading.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub destination_bucket: String,
    pub key_prefix: String,
    /// Only notifications from this bucket are processed
    pub source_bucket: Option<String>,
    /// Originals announced as larger than this are failed without being read
    pub max_source_bytes: Option<u64>,
}

impl PipelineSettings {
    pub fn new(destination_bucket: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            destination_bucket: destination_bucket.into(),
            key_prefix: key_prefix.into(),
            source_bucket: None,
            max_source_bytes: None,
        }
    }

    pub fn with_source_bucket(mut self, source_bucket: Option<String>) -> Self {
        self.source_bucket = source_bucket;
        self
    }

    pub fn with_max_source_bytes(mut self, max_source_bytes: u64) -> Self {
        self.max_source_bytes = Some(max_source_bytes);
        self
    }
}

/// Thumbnail pipeline orchestrator.
///
/// Holds only immutable settings and shared collaborators, so one instance
/// serves every concurrent invocation.
pub struct ThumbnailPipeline {
    settings: PipelineSettings,
    filter: OriginFilter,
    transfer: Arc<dyn AssetTransfer>,
    deriver: Arc<dyn ThumbnailDeriver>,
    reporter: Arc<dyn StatusReporter>,
    notifier: Arc<dyn OutcomeNotifier>,
}

impl ThumbnailPipeline {
    /// The loop guard is bound to the bucket thumbnails are written to.
    pub fn new(
        settings: PipelineSettings,
        transfer: Arc<dyn AssetTransfer>,
        deriver: Arc<dyn ThumbnailDeriver>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        let filter = OriginFilter::new(settings.destination_bucket.clone())
            .with_source_bucket(settings.source_bucket.clone());
        Self {
            settings,
            filter,
            transfer,
            deriver,
            reporter,
            notifier: Arc::new(NoOpNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn OutcomeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Handle one delivered notification. Never fails; see [`Disposition`].
    pub async fn handle(
        &self,
        notification: &StorageNotification,
        signal: &InvocationSignal,
    ) -> Disposition {
        let decision = self.filter.evaluate(notification);
        if decision.is_discard() {
            tracing::debug!(
                bucket = %notification.bucket,
                key = %notification.object_key,
                event_kind = %notification.event_kind,
                reason = decision.as_str(),
                "Notification discarded"
            );
            return Disposition::Discarded(decision);
        }

        let identity = match AssetIdentity::parse(&notification.object_key) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(
                    bucket = %notification.bucket,
                    key = %notification.object_key,
                    error = %e,
                    "Rejecting notification with malformed object key"
                );
                return Disposition::Rejected(e);
            }
        };

        let span = tracing::info_span!(
            "thumbnail",
            asset_id = %identity.asset_id,
            owner_id = %identity.owner_id,
            bucket = %notification.bucket,
            key = %notification.object_key,
        );

        self.process(notification, &identity, signal)
            .instrument(span)
            .await
    }

    async fn process(
        &self,
        notification: &StorageNotification,
        identity: &AssetIdentity,
        signal: &InvocationSignal,
    ) -> Disposition {
        let start = Instant::now();

        let outcome = match self.produce(notification, identity, signal).await {
            Ok(outcome) => outcome,
            Err(stage) => {
                tracing::warn!(
                    stage = %stage,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Invocation cancelled, leaving the notification for redelivery"
                );
                return Disposition::Cancelled { stage };
            }
        };

        match &outcome {
            ProcessingOutcome::Completed { thumbnail_location } => {
                tracing::info!(
                    location = %thumbnail_location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Thumbnail generated"
                );
            }
            ProcessingOutcome::Failed { reason } => log_failure(reason),
        }

        if let Err(e) = self.reporter.report(identity.asset_id, &outcome).await {
            tracing::error!(
                error = %e,
                status = %outcome.status(),
                location = outcome.thumbnail_location(),
                code = outcome.failure().map(PipelineError::error_code),
                reason = outcome.failure().map(tracing::field::display),
                "Failed to report thumbnail status"
            );
            return Disposition::ReportFailed {
                outcome,
                error: PipelineError::Reporting(e.to_string()),
            };
        }

        if let Err(e) = self.notifier.notify(identity, &outcome).await {
            tracing::warn!(error = %e, "Failed to send thumbnail notification");
        }

        Disposition::Reported(outcome)
    }

    /// Read, derive, write. `Err` carries the stage the signal interrupted.
    async fn produce(
        &self,
        notification: &StorageNotification,
        identity: &AssetIdentity,
        signal: &InvocationSignal,
    ) -> Result<ProcessingOutcome, Stage> {
        if let (Some(size), Some(limit)) = (notification.size, self.settings.max_source_bytes) {
            if size > limit {
                return Ok(PipelineError::Derivation(format!(
                    "Source is {} bytes, limit is {} bytes",
                    size, limit
                ))
                .into());
            }
        }

        let original = match race(
            signal,
            Stage::Read,
            self.transfer
                .read(&notification.bucket, &notification.object_key),
        )
        .await?
        {
            Ok(data) => data,
            Err(e) => return Ok(PipelineError::Transfer(e.to_string()).into()),
        };

        let thumbnail = match race(signal, Stage::Derive, self.deriver.derive(&original)).await? {
            Ok(thumbnail) => thumbnail,
            Err(e) => return Ok(PipelineError::Derivation(e.to_string()).into()),
        };
        drop(original);

        let key = thumbnail_key(
            &self.settings.key_prefix,
            identity.asset_id,
            thumbnail.extension(),
        );
        let location = match race(
            signal,
            Stage::Write,
            self.transfer.write(
                &self.settings.destination_bucket,
                &key,
                thumbnail.data.clone(),
                thumbnail.content_type(),
            ),
        )
        .await?
        {
            Ok(location) => location,
            Err(e) => return Ok(PipelineError::Transfer(e.to_string()).into()),
        };

        Ok(ProcessingOutcome::Completed {
            thumbnail_location: location,
        })
    }
}

/// Run `step` unless the signal fires first. A signal that already fired wins.
async fn race<F: Future>(signal: &InvocationSignal, stage: Stage, step: F) -> Result<F::Output, Stage> {
    tokio::select! {
        biased;
        _ = signal.fired() => Err(stage),
        output = step => Ok(output),
    }
}

fn log_failure(reason: &PipelineError) {
    let code = reason.error_code();
    match reason.log_level() {
        LogLevel::Debug => tracing::debug!(error = %reason, code = code, "Thumbnail generation failed"),
        LogLevel::Warn => tracing::warn!(error = %reason, code = code, "Thumbnail generation failed"),
        LogLevel::Error => {
            tracing::error!(error = %reason, code = code, "Thumbnail generation failed")
        }
    }
}
