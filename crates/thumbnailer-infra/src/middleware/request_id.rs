use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
/// Binary-mode CloudEvent id; stable across redeliveries of one event.
const CLOUDEVENT_ID_HEADER: &str = "ce-id";

/// Request ID extension type
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request ID middleware
///
/// Uses the incoming X-Request-ID, else the CloudEvent id, else a fresh UUID.
/// The id is stored in the request extensions and echoed in the response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = [REQUEST_ID_HEADER, CLOUDEVENT_ID_HEADER]
        .iter()
        .find_map(|name| {
            request
                .headers()
                .get(*name)
                .and_then(|h| h.to_str().ok())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Extract request ID from request extensions
pub fn get_request_id(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
}
