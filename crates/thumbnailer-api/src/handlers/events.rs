//! Storage notification intake.
//!
//! Every decodable event is acknowledged with 200 whatever its business
//! outcome, so the delivery system does not redeliver failures that a retry
//! cannot fix. Only a cancelled invocation asks for redelivery.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use thumbnailer_core::AppError;
use thumbnailer_pipeline::Disposition;

use crate::cloudevent::{decode_event, InboundEvent};
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventAck {
    pub status: &'static str,
}

pub async fn receive_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = match decode_event(&headers, &body, state.finalized_event_types.as_slice())? {
        InboundEvent::Notification(event) => event,
        InboundEvent::Ignored { id, event_type } => {
            tracing::debug!(
                event_id = ?id,
                event_type = %event_type,
                "Ignoring non-finalize event"
            );
            return Ok((StatusCode::OK, Json(EventAck { status: "ignored" })));
        }
    };

    tracing::info!(
        event_id = ?event.id,
        event_type = %event.event_type,
        bucket = %event.notification.bucket,
        key = %event.notification.object_key,
        size = ?event.notification.size,
        "Storage notification received"
    );

    let signal = state.invocation_signal();
    let disposition = state.pipeline.handle(&event.notification, &signal).await;

    match disposition {
        Disposition::Cancelled { stage } => Err(AppError::ServiceUnavailable(format!(
            "Invocation cancelled during {}",
            stage
        ))
        .into()),
        other => Ok((
            StatusCode::OK,
            Json(EventAck {
                status: other.label(),
            }),
        )),
    }
}
