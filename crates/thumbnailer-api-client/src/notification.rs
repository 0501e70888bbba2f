//! Best-effort user notification once a thumbnail outcome is known.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thumbnailer_core::{
    AssetIdentity, OutcomeNotifier, ProcessingOutcome, ReportError, ThumbnailStatus,
};
use uuid::Uuid;

use crate::ApiClient;

const NOTIFICATION_PATH: &str = "api/notifications/thumbnail";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailNotification<'a> {
    pub user_id: &'a str,
    pub image_id: Uuid,
    /// `completed` or `failed`
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Posts outcomes to `{base_url}/api/notifications/thumbnail`.
pub struct NotificationApiClient {
    client: ApiClient,
}

impl NotificationApiClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OutcomeNotifier for NotificationApiClient {
    async fn notify(
        &self,
        identity: &AssetIdentity,
        outcome: &ProcessingOutcome,
    ) -> Result<(), ReportError> {
        let body = ThumbnailNotification {
            user_id: &identity.owner_id,
            image_id: identity.asset_id,
            status: match outcome.status() {
                ThumbnailStatus::Completed => "completed",
                ThumbnailStatus::Failed => "failed",
            },
            timestamp: Utc::now(),
        };

        self.client.post_json(NOTIFICATION_PATH, &body).await
    }
}
