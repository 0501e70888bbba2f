//! Loop guard and event-kind gate, evaluated before any parsing or I/O.
//!
//! The pipeline writes thumbnails into a bucket that may itself emit upload
//! notifications. Handling those would trigger another thumbnail, and so on.

use crate::models::StorageNotification;

/// Returns true when a notification from `source_bucket` is the pipeline's own output.
pub fn is_own_output(source_bucket: &str, destination_bucket: &str) -> bool {
    source_bucket == destination_bucket
}

/// Why a notification was (or was not) let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    /// Source bucket is the thumbnail destination bucket.
    OwnOutput,
    /// Event is not a completed upload.
    NotFinalized,
    /// A source bucket is configured and this notification came from elsewhere.
    ForeignSource,
}

impl FilterDecision {
    pub fn is_discard(self) -> bool {
        !matches!(self, FilterDecision::Accept)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterDecision::Accept => "accept",
            FilterDecision::OwnOutput => "own_output",
            FilterDecision::NotFinalized => "not_finalized",
            FilterDecision::ForeignSource => "foreign_source",
        }
    }
}

/// Origin filter bound to the pipeline's configured buckets.
#[derive(Debug, Clone)]
pub struct OriginFilter {
    destination_bucket: String,
    source_bucket: Option<String>,
}

impl OriginFilter {
    pub fn new(destination_bucket: impl Into<String>) -> Self {
        Self {
            destination_bucket: destination_bucket.into(),
            source_bucket: None,
        }
    }

    /// Only accept notifications coming from `source_bucket`.
    pub fn with_source_bucket(mut self, source_bucket: Option<String>) -> Self {
        self.source_bucket = source_bucket;
        self
    }

    pub fn destination_bucket(&self) -> &str {
        &self.destination_bucket
    }

    /// The own-output check runs first: it is the one that must never be skipped.
    pub fn evaluate(&self, notification: &StorageNotification) -> FilterDecision {
        if is_own_output(&notification.bucket, &self.destination_bucket) {
            return FilterDecision::OwnOutput;
        }
        if !notification.event_kind.is_finalized() {
            return FilterDecision::NotFinalized;
        }
        if let Some(ref source) = self.source_bucket {
            if &notification.bucket != source {
                return FilterDecision::ForeignSource;
            }
        }
        FilterDecision::Accept
    }
}
