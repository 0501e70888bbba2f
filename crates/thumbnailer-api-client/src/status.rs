//! Thumbnail status updates towards the Image API.

use async_trait::async_trait;
use serde::Serialize;
use thumbnailer_core::{ProcessingOutcome, ReportError, StatusReporter, ThumbnailStatus};
use uuid::Uuid;

use crate::ApiClient;

const ID_PLACEHOLDER: &str = "{id}";

/// Body of the status PATCH.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest<'a> {
    pub status: ThumbnailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<'a> From<&'a ProcessingOutcome> for StatusUpdateRequest<'a> {
    fn from(outcome: &'a ProcessingOutcome) -> Self {
        Self {
            status: outcome.status(),
            thumbnail_url: outcome.thumbnail_location(),
            reason: outcome.failure().map(|e| e.to_string()),
        }
    }
}

/// Reports outcomes with `PATCH {base_url}/{status_path}`, `{id}` replaced by the asset id.
pub struct MetadataStatusReporter {
    client: ApiClient,
    status_path: String,
}

impl MetadataStatusReporter {
    pub fn new(client: ApiClient, status_path: impl Into<String>) -> Result<Self, ReportError> {
        let status_path = status_path.into();
        if !status_path.contains(ID_PLACEHOLDER) {
            return Err(ReportError::Config(format!(
                "status path '{}' has no {} placeholder",
                status_path, ID_PLACEHOLDER
            )));
        }
        Ok(Self {
            client,
            status_path,
        })
    }

    pub fn status_path_for(&self, asset_id: Uuid) -> String {
        self.status_path
            .replace(ID_PLACEHOLDER, &asset_id.to_string())
    }
}

#[async_trait]
impl StatusReporter for MetadataStatusReporter {
    async fn report(&self, asset_id: Uuid, outcome: &ProcessingOutcome) -> Result<(), ReportError> {
        let path = self.status_path_for(asset_id);
        let body = StatusUpdateRequest::from(outcome);

        self.client.patch_json(&path, &body).await?;

        tracing::debug!(
            asset_id = %asset_id,
            status = %body.status,
            "Thumbnail status reported"
        );
        Ok(())
    }
}
