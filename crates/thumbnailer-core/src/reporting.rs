//! Outbound hooks towards the services that own the image metadata.
//!
//! The pipeline only depends on these traits. The HTTP implementations live in
//! `thumbnailer-api-client`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AssetIdentity, ProcessingOutcome};

/// Error returned by an outcome sink.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} rejected the update with status {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Reporter misconfigured: {0}")]
    Config(String),
}

/// Informs the metadata service of the thumbnail outcome for an asset.
///
/// Called at most once per pipeline invocation. Implementations must not retry
/// internally; a failed report is closed by redelivery of the notification.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn report(&self, asset_id: Uuid, outcome: &ProcessingOutcome) -> Result<(), ReportError>;
}

/// Best-effort notification to the asset owner once an outcome is known.
#[async_trait]
pub trait OutcomeNotifier: Send + Sync {
    async fn notify(
        &self,
        identity: &AssetIdentity,
        outcome: &ProcessingOutcome,
    ) -> Result<(), ReportError>;
}

/// No-op notifier for deployments without a notification service
pub struct NoOpNotifier;

#[async_trait]
impl OutcomeNotifier for NoOpNotifier {
    async fn notify(
        &self,
        _identity: &AssetIdentity,
        _outcome: &ProcessingOutcome,
    ) -> Result<(), ReportError> {
        Ok(())
    }
}
