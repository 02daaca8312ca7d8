//! Cross-context message contracts.
//!
//! The capture shim runs in the page context and talks to the rest of the
//! system over a generic same-document channel; delivery is fire-and-forget,
//! at most once, with no acknowledgment. Receipt filters on the `type` marker
//! and silently drops everything else, so foreign traffic on the channel is
//! harmless.

use serde::{Deserialize, Serialize};

use crate::options::ConversionOptions;

/// Marker tag of a clipboard capture event.
pub const CAPTURE_EVENT_TYPE: &str = "chatmd.capture";

/// Marker tag of an export request.
pub const EXPORT_REQUEST_TYPE: &str = "chatmd.export";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturePayload {
    pub text: String,
}

/// One captured clipboard operation, as posted by the page-context shim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    #[serde(rename = "type")]
    pub marker: String,
    /// Capture origin: `copy`, `cut`, `writeText`, `write`
    pub kind: String,
    pub payload: CapturePayload,
    /// Milliseconds since the epoch at capture time
    pub ts: i64,
}

impl CaptureEvent {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, ts: i64) -> Self {
        CaptureEvent {
            marker: CAPTURE_EVENT_TYPE.to_string(),
            kind: kind.into(),
            payload: CapturePayload { text: text.into() },
            ts,
        }
    }
}

/// Accept a raw channel message as a capture event if it carries our marker.
pub fn parse_capture_event(value: &serde_json::Value) -> Option<CaptureEvent> {
    let event: CaptureEvent = serde_json::from_value(value.clone()).ok()?;
    (event.marker == CAPTURE_EVENT_TYPE).then_some(event)
}

/// An export request, answered with the Markdown document (empty on failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(rename = "type")]
    pub marker: String,
    pub options: ConversionOptions,
}

impl ExportRequest {
    pub fn new(options: ConversionOptions) -> Self {
        ExportRequest {
            marker: EXPORT_REQUEST_TYPE.to_string(),
            options,
        }
    }
}

pub fn parse_export_request(value: &serde_json::Value) -> Option<ExportRequest> {
    let request: ExportRequest = serde_json::from_value(value.clone()).ok()?;
    (request.marker == EXPORT_REQUEST_TYPE).then_some(request)
}
