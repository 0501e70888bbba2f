use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::pipeline_error::PipelineError;

/// Thumbnail status as understood by the metadata service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThumbnailStatus {
    Completed,
    Failed,
}

impl Display for ThumbnailStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailStatus::Completed => write!(f, "Completed"),
            ThumbnailStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Business result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    Completed { thumbnail_location: String },
    Failed { reason: PipelineError },
}

impl ProcessingOutcome {
    pub fn status(&self) -> ThumbnailStatus {
        match self {
            ProcessingOutcome::Completed { .. } => ThumbnailStatus::Completed,
            ProcessingOutcome::Failed { .. } => ThumbnailStatus::Failed,
        }
    }

    pub fn thumbnail_location(&self) -> Option<&str> {
        match self {
            ProcessingOutcome::Completed { thumbnail_location } => Some(thumbnail_location),
            ProcessingOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        match self {
            ProcessingOutcome::Completed { .. } => None,
            ProcessingOutcome::Failed { reason } => Some(reason),
        }
    }
}

impl From<PipelineError> for ProcessingOutcome {
    fn from(reason: PipelineError) -> Self {
        ProcessingOutcome::Failed { reason }
    }
}
