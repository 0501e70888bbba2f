//! Event intake integration tests.
//!
//! Run with: `cargo test -p thumbnailer-api --test intake_test`

mod helpers;

use bytes::Bytes;
use helpers::{
    destination_bucket, setup_test_app, setup_test_app_with, storage_object, structured_event,
    upload_key, ASSET_ID, SOURCE_BUCKET,
};
use serde_json::{json, Value};
use thumbnailer_core::{PipelineError, ProcessingOutcome, GCS_OBJECT_FINALIZED};
use thumbnailer_pipeline::test_helpers::{InMemoryTransfer, StaticDeriver};
use uuid::Uuid;

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app();

    for path in ["/health", "/health/live"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>(), json!({ "status": "alive" }));
    }
}

#[tokio::test]
async fn test_structured_event_produces_thumbnail() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&structured_event(GCS_OBJECT_FINALIZED, SOURCE_BUCKET, &upload_key()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "reported");

    let thumb_key = format!("thumbnails/{}_thumb.png", ASSET_ID);
    let (data, content_type) = app
        .transfer
        .object(destination_bucket(), &thumb_key)
        .expect("thumbnail written");
    assert_eq!(&data[..], StaticDeriver::OUTPUT);
    assert_eq!(content_type, "image/png");

    let reports = app.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, Uuid::parse_str(ASSET_ID).unwrap());
    assert_eq!(
        reports[0].1,
        ProcessingOutcome::Completed {
            thumbnail_location: format!("memory://{}/{}", destination_bucket(), thumb_key),
        }
    );
    assert_eq!(app.notifier.notifications().len(), 1);
}

#[tokio::test]
async fn test_binary_event_on_events_path() {
    let app = setup_test_app();

    let body = storage_object(SOURCE_BUCKET, &upload_key()).to_string();
    let response = app
        .client()
        .post("/events")
        .add_header("ce-specversion", "1.0")
        .add_header("ce-id", "evt-binary")
        .add_header("ce-type", GCS_OBJECT_FINALIZED)
        .add_header("content-type", "application/json")
        .bytes(Bytes::from(body))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "reported");
    assert_eq!(app.reporter.reports().len(), 1);
}

#[tokio::test]
async fn test_non_finalized_event_is_ignored() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&structured_event(
            "google.cloud.storage.object.v1.deleted",
            SOURCE_BUCKET,
            &upload_key(),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "ignored");
    assert!(app.transfer.reads().is_empty());
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_non_finalized_event_with_null_data_is_ignored() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&json!({
            "specversion": "1.0",
            "id": "evt-null",
            "type": "google.cloud.storage.object.v1.deleted",
            "data": null
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "ignored");
    assert!(app.transfer.reads().is_empty());
}

#[tokio::test]
async fn test_foreign_event_payload_is_ignored() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&json!({
            "specversion": "1.0",
            "id": "evt-audit",
            "type": "google.cloud.audit.log.v1.written",
            "data": {
                "protoPayload": {
                    "methodName": "storage.buckets.update",
                    "resourceName": "projects/_/buckets/uploads"
                }
            }
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "ignored");
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_binary_non_finalized_event_with_empty_body_is_ignored() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/events")
        .add_header("ce-specversion", "1.0")
        .add_header("ce-id", "evt-binary-deleted")
        .add_header("ce-type", "google.cloud.storage.object.v1.deleted")
        .bytes(Bytes::new())
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "ignored");
    assert!(app.transfer.reads().is_empty());
}

#[tokio::test]
async fn test_binary_finalized_event_with_empty_body_returns_400() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/events")
        .add_header("ce-specversion", "1.0")
        .add_header("ce-type", GCS_OBJECT_FINALIZED)
        .bytes(Bytes::new())
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.transfer.reads().is_empty());
}

#[tokio::test]
async fn test_own_output_is_discarded_without_io() {
    let app = setup_test_app();

    let key = format!("thumbnails/{}_thumb.png", ASSET_ID);
    let response = app
        .client()
        .post("/")
        .json(&structured_event(GCS_OBJECT_FINALIZED, destination_bucket(), &key))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "own_output");
    assert!(app.transfer.reads().is_empty());
    assert!(app.transfer.writes().is_empty());
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_malformed_key_is_acknowledged_without_report() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&structured_event(
            GCS_OBJECT_FINALIZED,
            SOURCE_BUCKET,
            "user-42/not-a-uuid/photo.jpg",
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "rejected");
    assert!(app.transfer.reads().is_empty());
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_read_failure_reports_failed() {
    let transfer = InMemoryTransfer::new().failing_reads();
    let app = setup_test_app_with(transfer, StaticDeriver::succeeding());

    let response = app
        .client()
        .post("/")
        .json(&structured_event(GCS_OBJECT_FINALIZED, SOURCE_BUCKET, &upload_key()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "reported");

    let reports = app.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].1,
        ProcessingOutcome::Failed {
            reason: PipelineError::Transfer(_)
        }
    ));
    assert_eq!(app.deriver.calls(), 0);
}

#[tokio::test]
async fn test_derive_failure_reports_failed_and_writes_nothing() {
    let transfer =
        InMemoryTransfer::new().with_object(SOURCE_BUCKET, &upload_key(), &b"not-an-image"[..]);
    let app = setup_test_app_with(transfer, StaticDeriver::failing());

    let response = app
        .client()
        .post("/")
        .json(&structured_event(GCS_OBJECT_FINALIZED, SOURCE_BUCKET, &upload_key()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(app.transfer.writes().is_empty());

    let reports = app.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].1,
        ProcessingOutcome::Failed {
            reason: PipelineError::Derivation(_)
        }
    ));
}

#[tokio::test]
async fn test_cancelled_invocation_returns_503() {
    let transfer = InMemoryTransfer::new().stalled_reads();
    let app = setup_test_app_with(transfer, StaticDeriver::succeeding());
    app.shutdown.cancel();

    let response = app
        .client()
        .post("/")
        .json(&structured_event(GCS_OBJECT_FINALIZED, SOURCE_BUCKET, &upload_key()))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), 503);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(body["recoverable"], true);
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_invalid_json_returns_400() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .add_header("content-type", "application/json")
        .bytes(Bytes::from_static(b"{not json"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_EVENT");
    assert!(app.transfer.reads().is_empty());
}

#[tokio::test]
async fn test_event_without_data_returns_400() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&json!({ "specversion": "1.0", "type": GCS_OBJECT_FINALIZED }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_event_without_bucket_returns_400() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/")
        .json(&json!({
            "specversion": "1.0",
            "type": GCS_OBJECT_FINALIZED,
            "data": { "name": upload_key() }
        }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "req-123")
        .await;

    assert_eq!(response.header("x-request-id"), "req-123");
}
