//! CloudEvent decoding for storage notifications.
//!
//! Two encodings are accepted. In structured mode the whole event is the JSON
//! body (`specversion`, `type`, `data`, ...). In binary mode the attributes
//! travel as `ce-*` headers and the body is the storage object itself. A
//! request carrying a `ce-type` header is treated as binary mode.

use axum::http::HeaderMap;
use serde::Deserialize;
use thumbnailer_core::{EventKind, StorageNotification};

use crate::constants::{CE_ID_HEADER, CE_TYPE_HEADER};

/// Why a request could not be turned into a notification
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Event has no type")]
    MissingType,

    #[error("Event has no data")]
    MissingData,

    #[error("Event data is not a storage object: {0}")]
    InvalidData(String),
}

#[derive(Debug, Deserialize)]
struct StructuredEvent {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default)]
    event_type: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Storage object payload. Cloud Storage sends `size` and `generation` as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObjectData {
    bucket: String,
    name: String,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    size: Option<StringOrNumber>,
    #[serde(default)]
    generation: Option<StringOrNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(u64),
    String(String),
}

impl StringOrNumber {
    fn as_u64(&self) -> Option<u64> {
        match self {
            StringOrNumber::Number(n) => Some(*n),
            StringOrNumber::String(s) => s.parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            StringOrNumber::Number(n) => n.to_string(),
            StringOrNumber::String(s) => s,
        }
    }
}

/// A storage notification decoded from a finalized event.
#[derive(Debug)]
pub struct DecodedEvent {
    pub id: Option<String>,
    pub event_type: String,
    pub notification: StorageNotification,
}

/// What a well-formed request carries.
#[derive(Debug)]
pub enum InboundEvent {
    /// Event type outside the finalized list. Its data is never inspected.
    Ignored {
        id: Option<String>,
        event_type: String,
    },
    Notification(DecodedEvent),
}

/// Where the event data lives.
enum Payload {
    /// Structured mode: the `data` member of the envelope
    Embedded(Option<serde_json::Value>),
    /// Binary mode: the request body
    Body,
}

/// Decode a request.
///
/// The event type is resolved first, so events of other types are
/// acknowledged whatever their data looks like. Only finalized events must
/// carry a storage object.
pub fn decode_event<S: AsRef<str>>(
    headers: &HeaderMap,
    body: &[u8],
    finalized_types: &[S],
) -> Result<InboundEvent, EnvelopeError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let (id, event_type, payload) = match header(CE_TYPE_HEADER) {
        Some(event_type) => (header(CE_ID_HEADER), event_type, Payload::Body),
        None => {
            let event: StructuredEvent = serde_json::from_slice(body)
                .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
            let event_type = event.event_type.ok_or(EnvelopeError::MissingType)?;
            (event.id, event_type, Payload::Embedded(event.data))
        }
    };

    if event_type.trim().is_empty() {
        return Err(EnvelopeError::MissingType);
    }

    let event_kind = EventKind::classify(&event_type, finalized_types);
    if !event_kind.is_finalized() {
        return Ok(InboundEvent::Ignored { id, event_type });
    }

    let data = match payload {
        Payload::Embedded(data) => data.ok_or(EnvelopeError::MissingData)?,
        Payload::Body => {
            if body.is_empty() {
                return Err(EnvelopeError::MissingData);
            }
            serde_json::from_slice(body).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?
        }
    };
    if data.is_null() {
        return Err(EnvelopeError::MissingData);
    }

    let object: StorageObjectData =
        serde_json::from_value(data).map_err(|e| EnvelopeError::InvalidData(e.to_string()))?;

    if object.bucket.is_empty() {
        return Err(EnvelopeError::InvalidData("bucket is empty".to_string()));
    }
    if object.name.is_empty() {
        return Err(EnvelopeError::InvalidData("name is empty".to_string()));
    }

    let notification = StorageNotification {
        bucket: object.bucket,
        object_key: object.name,
        event_kind,
        content_type: object.content_type,
        size: object.size.as_ref().and_then(StringOrNumber::as_u64),
        generation: object.generation.map(StringOrNumber::into_string),
    };

    Ok(InboundEvent::Notification(DecodedEvent {
        id,
        event_type,
        notification,
    }))
}
