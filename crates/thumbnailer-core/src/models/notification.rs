use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// CloudEvent type emitted by Cloud Storage when an upload completes.
pub const GCS_OBJECT_FINALIZED: &str = "google.cloud.storage.object.v1.finalized";

/// Kind of storage event carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A complete object has been written.
    Finalized,
    /// Anything else (deletes, metadata updates, multipart progress). Keeps the raw type.
    Other(String),
}

impl EventKind {
    /// Classify a raw event type against the configured list of "finalized" types.
    pub fn classify<S: AsRef<str>>(event_type: &str, finalized_types: &[S]) -> Self {
        if finalized_types
            .iter()
            .any(|t| t.as_ref().eq_ignore_ascii_case(event_type))
        {
            EventKind::Finalized
        } else {
            EventKind::Other(event_type.to_string())
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, EventKind::Finalized)
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EventKind::Finalized => write!(f, "finalized"),
            EventKind::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One "object changed" notification, as decoded by the event intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageNotification {
    pub bucket: String,
    pub object_key: String,
    pub event_kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
}

impl StorageNotification {
    pub fn new(
        bucket: impl Into<String>,
        object_key: impl Into<String>,
        event_kind: EventKind,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            object_key: object_key.into(),
            event_kind,
            content_type: None,
            size: None,
            generation: None,
        }
    }

    /// Shorthand for a completed-upload notification.
    pub fn finalized(bucket: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self::new(bucket, object_key, EventKind::Finalized)
    }
}
