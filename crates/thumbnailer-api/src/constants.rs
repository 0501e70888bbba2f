//! API constants

/// Service name reported in logs
pub const SERVICE_NAME: &str = "thumbnailer";

/// Storage notifications are small JSON documents; anything larger is not one.
pub const MAX_EVENT_BODY_BYTES: usize = 256 * 1024;

/// Binary-mode CloudEvent attribute headers
pub const CE_TYPE_HEADER: &str = "ce-type";
pub const CE_ID_HEADER: &str = "ce-id";
