//! Job Event Logger
//!
//! Capture request state transitions, emitted as structured events on the
//! `job_events` target so operators can follow a request end to end.

use bunwatch_core::{JobEvent, JobState};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::redact::redact_sensitive_data;

pub struct JobLogger;

impl JobLogger {
    /// Record one transition. Free-text detail fields are redacted first.
    pub fn record(event: JobEvent) {
        let event = sanitize(event);
        let detail = event.detail.to_string();
        match event.state {
            JobState::Failed => warn!(
                target: "job_events",
                request_id = %event.request_id,
                kind = %event.kind,
                user = %event.requested_by,
                state = %event.state,
                detail = %detail,
                "Capture job failed"
            ),
            state if state.is_terminal() => info!(
                target: "job_events",
                request_id = %event.request_id,
                kind = %event.kind,
                user = %event.requested_by,
                state = %event.state,
                detail = %detail,
                "Capture job finished"
            ),
            _ => debug!(
                target: "job_events",
                request_id = %event.request_id,
                kind = %event.kind,
                user = %event.requested_by,
                state = %event.state,
                detail = %detail,
                "Capture job transition"
            ),
        }
    }
}

/// Redact every string leaf of the event detail.
pub fn sanitize(mut event: JobEvent) -> JobEvent {
    event.detail = redact_value(event.detail);
    event
}

fn redact_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact_sensitive_data(&s)),
        Value::Array(arr) => Value::Array(arr.into_iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, redact_value(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunwatch_core::{CaptureKind, CaptureRequest, Requester};

    #[test]
    fn sanitize_redacts_nested_strings() {
        let request = CaptureRequest::new(CaptureKind::Clip, Requester::new("1", "alice"));
        let event = JobEvent::new(
            &request,
            JobState::Failed,
            serde_json::json!({
                "error": "could not open rtsp://admin:pw@cam/live",
                "elapsed_ms": 12,
            }),
        );
        let clean = sanitize(event);
        assert_eq!(clean.detail["error"], "could not open rtsp://[REDACTED]@cam/live");
        assert_eq!(clean.detail["elapsed_ms"], 12);
    }
}
