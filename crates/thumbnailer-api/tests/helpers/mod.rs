//! Test app wired to the in-memory pipeline fakes.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thumbnailer_api::{setup_routes, AppState};
use thumbnailer_core::GCS_OBJECT_FINALIZED;
use thumbnailer_pipeline::test_helpers::{
    pipeline_with, InMemoryTransfer, RecordingNotifier, RecordingReporter, StaticDeriver,
    TEST_DESTINATION_BUCKET,
};
use tokio_util::sync::CancellationToken;

pub const SOURCE_BUCKET: &str = "uploads";
pub const ASSET_ID: &str = "3fae1d2c-9b1e-4f2a-8c3e-111111111111";

/// Object key of a well-formed upload for [`ASSET_ID`].
pub fn upload_key() -> String {
    format!("user-42/{}/photo.jpg", ASSET_ID)
}

/// Test application: server plus handles on every fake it was built from.
pub struct TestApp {
    pub server: TestServer,
    pub transfer: InMemoryTransfer,
    pub deriver: StaticDeriver,
    pub reporter: RecordingReporter,
    pub notifier: RecordingNotifier,
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Test app whose transfer already holds the upload at [`upload_key`].
pub fn setup_test_app() -> TestApp {
    let transfer =
        InMemoryTransfer::new().with_object(SOURCE_BUCKET, &upload_key(), &b"jpeg-bytes"[..]);
    setup_test_app_with(transfer, StaticDeriver::succeeding())
}

pub fn setup_test_app_with(transfer: InMemoryTransfer, deriver: StaticDeriver) -> TestApp {
    let reporter = RecordingReporter::new();
    let notifier = RecordingNotifier::new();
    let shutdown = CancellationToken::new();

    let pipeline = pipeline_with(&transfer, &deriver, &reporter, &notifier);
    let state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        finalized_event_types: vec![GCS_OBJECT_FINALIZED.to_string()],
        pipeline_timeout: Duration::from_secs(30),
        shutdown: shutdown.clone(),
    });

    let server = TestServer::new(setup_routes(state)).expect("Failed to create test server");

    TestApp {
        server,
        transfer,
        deriver,
        reporter,
        notifier,
        shutdown,
    }
}

/// Structured-mode CloudEvent for an object in `bucket`.
pub fn structured_event(event_type: &str, bucket: &str, name: &str) -> Value {
    json!({
        "specversion": "1.0",
        "id": "evt-1",
        "source": format!("//storage.googleapis.com/projects/_/buckets/{}", bucket),
        "type": event_type,
        "datacontenttype": "application/json",
        "data": storage_object(bucket, name),
    })
}

/// Storage object payload as Cloud Storage sends it.
pub fn storage_object(bucket: &str, name: &str) -> Value {
    json!({
        "bucket": bucket,
        "name": name,
        "contentType": "image/jpeg",
        "size": "10",
        "generation": "1700000000000000",
    })
}

pub fn destination_bucket() -> &'static str {
    TEST_DESTINATION_BUCKET
}
