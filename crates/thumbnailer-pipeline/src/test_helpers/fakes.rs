use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thumbnailer_core::{
    AssetIdentity, OutcomeNotifier, ProcessingOutcome, ReportError, StatusReporter,
};
use thumbnailer_processing::{ProcessingError, Thumbnail, ThumbnailDeriver, ThumbnailFormat};
use thumbnailer_storage::{AssetTransfer, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

/// Object store kept in memory. Public URLs are `memory://{bucket}/{key}`.
#[derive(Clone, Default)]
#[allow(clippy::type_complexity)]
pub struct InMemoryTransfer {
    objects: Arc<Mutex<HashMap<(String, String), (Bytes, String)>>>,
    reads: Arc<Mutex<Vec<(String, String)>>>,
    writes: Arc<Mutex<Vec<(String, String)>>>,
    fail_reads: bool,
    fail_writes: bool,
    stall_reads: bool,
}

impl InMemoryTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, data: impl Into<Bytes>) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data.into(), "application/octet-stream".to_string()),
        );
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Reads never complete; used to exercise cancellation.
    pub fn stalled_reads(mut self) -> Self {
        self.stall_reads = true;
        self
    }

    pub fn reads(&self) -> Vec<(String, String)> {
        self.reads.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Stored bytes and content type.
    pub fn object(&self, bucket: &str, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl AssetTransfer for InMemoryTransfer {
    async fn read(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        self.reads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        if self.stall_reads {
            std::future::pending::<()>().await;
        }
        if self.fail_reads {
            return Err(StorageError::DownloadFailed("simulated read failure".into()));
        }

        self.object(bucket, key)
            .map(|(data, _)| data)
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn write(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        self.writes
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        if self.fail_writes {
            return Err(StorageError::UploadFailed("simulated write failure".into()));
        }

        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data, content_type.to_string()),
        );
        Ok(format!("memory://{}/{}", bucket, key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Deriver returning a fixed PNG-labelled payload, or always failing.
#[derive(Clone, Default)]
pub struct StaticDeriver {
    calls: Arc<Mutex<usize>>,
    fail: bool,
}

impl StaticDeriver {
    pub const OUTPUT: &'static [u8] = b"thumbnail-bytes";

    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ThumbnailDeriver for StaticDeriver {
    async fn derive(&self, _original: &[u8]) -> Result<Thumbnail, ProcessingError> {
        *self.calls.lock().unwrap() += 1;

        if self.fail {
            return Err(ProcessingError::Decode("simulated corrupt image".into()));
        }

        Ok(Thumbnail {
            data: Bytes::from_static(Self::OUTPUT),
            format: ThumbnailFormat::Png,
            width: 200,
            height: 200,
        })
    }
}

/// Reporter recording every call, optionally rejecting all of them.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(Uuid, ProcessingOutcome)>>>,
    fail: bool,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<(Uuid, ProcessingOutcome)> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn report(&self, asset_id: Uuid, outcome: &ProcessingOutcome) -> Result<(), ReportError> {
        self.reports.lock().unwrap().push((asset_id, outcome.clone()));

        if self.fail {
            return Err(ReportError::Rejected {
                endpoint: "memory://status".into(),
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Notifier recording every call, optionally failing all of them.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<(AssetIdentity, ProcessingOutcome)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<(AssetIdentity, ProcessingOutcome)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutcomeNotifier for RecordingNotifier {
    async fn notify(
        &self,
        identity: &AssetIdentity,
        outcome: &ProcessingOutcome,
    ) -> Result<(), ReportError> {
        self.notifications
            .lock()
            .unwrap()
            .push((identity.clone(), outcome.clone()));

        if self.fail {
            return Err(ReportError::Transport {
                endpoint: "memory://notifications".into(),
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}
