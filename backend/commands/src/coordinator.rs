//! Request coordinator
//!
//! Drives one capture request through its lifecycle:
//! `Received → Acknowledged → GuardCheck → Running → Completed`, or the
//! terminal `Rejected` / `Failed` states. The job guard for the request's
//! kind is held for exactly the `Running` interval.

use std::sync::Arc;
use std::time::Instant;

use bunwatch_core::{
    Attachment, CaptureError, CaptureKind, CapturePayload, CaptureRequest, CaptureResult,
    ClipSource, JobEvent, JobGuards, JobState, Responder, SnapshotSource,
};
use bunwatch_logging::JobLogger;
use bunwatch_media::{attachment_filename, detect_mime_type, is_inline_safe};
use serde_json::json;
use tracing::{error, info, warn};

use crate::types::ReplyMessages;

/// How a request ended.
#[derive(Debug)]
pub enum RequestOutcome {
    Completed,
    Rejected,
    Failed(CaptureError),
}

impl RequestOutcome {
    pub fn state(&self) -> JobState {
        match self {
            RequestOutcome::Completed => JobState::Completed,
            RequestOutcome::Rejected => JobState::Rejected,
            RequestOutcome::Failed(_) => JobState::Failed,
        }
    }
}

pub struct RequestCoordinator {
    guards: JobGuards,
    snapshot: Option<Arc<dyn SnapshotSource>>,
    clip: Option<Arc<dyn ClipSource>>,
    messages: ReplyMessages,
    snapshot_filename: String,
}

impl RequestCoordinator {
    pub fn new(guards: JobGuards) -> Self {
        Self {
            guards,
            snapshot: None,
            clip: None,
            messages: ReplyMessages::default(),
            snapshot_filename: "snapshot.jpg".into(),
        }
    }

    pub fn with_snapshot_source(mut self, source: Arc<dyn SnapshotSource>) -> Self {
        self.snapshot = Some(source);
        self
    }

    pub fn with_clip_source(mut self, source: Arc<dyn ClipSource>) -> Self {
        self.clip = Some(source);
        self
    }

    pub fn with_messages(mut self, messages: ReplyMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_snapshot_filename(mut self, filename: impl Into<String>) -> Self {
        self.snapshot_filename = filename.into();
        self
    }

    pub fn guards(&self) -> &JobGuards {
        &self.guards
    }

    pub fn messages(&self) -> &ReplyMessages {
        &self.messages
    }

    pub fn is_configured(&self, kind: CaptureKind) -> bool {
        match kind {
            CaptureKind::Snapshot => self.snapshot.is_some(),
            CaptureKind::Clip => self.clip.is_some(),
        }
    }

    /// Handle one request end to end. Never panics on capture failure;
    /// every failure is answered with a generic message and logged.
    pub async fn handle(&self, request: CaptureRequest, responder: &dyn Responder) -> RequestOutcome {
        let kind = request.kind;
        let started = Instant::now();
        record(&request, JobState::Received, json!({ "issued_at": request.issued_at }));

        if let Err(e) = responder.acknowledge().await {
            warn!(kind = %kind, user = %request.requested_by.name, error = %e, "Failed to acknowledge request");
            let err = CaptureError::Transport(e.to_string());
            record(&request, JobState::Failed, json!({ "error": err.label(), "reason": err.to_string() }));
            return RequestOutcome::Failed(err);
        }
        record(&request, JobState::Acknowledged, json!({}));

        if !self.is_configured(kind) {
            let err = CaptureError::ConfigurationMissing(kind);
            warn!(kind = %kind, user = %request.requested_by.name, "Capture requested but no source is configured");
            record(&request, JobState::Failed, json!({ "error": err.label() }));
            self.send_reply(responder, &request, &self.messages.not_configured).await;
            return RequestOutcome::Failed(err);
        }

        record(&request, JobState::GuardCheck, json!({}));
        let Some(permit) = self.guards.try_acquire(kind) else {
            info!(kind = %kind, user = %request.requested_by.name, "Rejected: job already in progress");
            record(
                &request,
                JobState::Rejected,
                json!({ "error": CaptureError::AlreadyInProgress(kind).label() }),
            );
            self.send_reply(responder, &request, &self.messages.rejected).await;
            return RequestOutcome::Rejected;
        };

        record(&request, JobState::Running, json!({}));
        let result = self.run(kind).await;
        let held_ms = permit.held_for().as_millis() as u64;
        drop(permit);

        match result {
            Ok(payload) => {
                record(
                    &request,
                    JobState::Completed,
                    json!({
                        "payload": payload.describe(),
                        "held_ms": held_ms,
                        "elapsed_ms": started.elapsed().as_millis() as u64,
                    }),
                );
                self.deliver(responder, &request, payload).await;
                RequestOutcome::Completed
            }
            Err(err) => {
                error!(
                    kind = %kind,
                    user = %request.requested_by.name,
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Capture failed"
                );
                record(
                    &request,
                    JobState::Failed,
                    json!({
                        "error": err.label(),
                        "reason": err.to_string(),
                        "held_ms": held_ms,
                    }),
                );
                self.send_reply(responder, &request, self.messages.failure(kind)).await;
                RequestOutcome::Failed(err)
            }
        }
    }

    async fn run(&self, kind: CaptureKind) -> CaptureResult {
        match kind {
            CaptureKind::Snapshot => {
                let source = self
                    .snapshot
                    .as_ref()
                    .ok_or(CaptureError::ConfigurationMissing(kind))?;
                source.fetch_snapshot().await.map(CapturePayload::Image)
            }
            CaptureKind::Clip => {
                let source = self
                    .clip
                    .as_ref()
                    .ok_or(CaptureError::ConfigurationMissing(kind))?;
                source.capture_clip().await.map(CapturePayload::File)
            }
        }
    }

    async fn deliver(&self, responder: &dyn Responder, request: &CaptureRequest, payload: CapturePayload) {
        let attachment = match payload {
            CapturePayload::Image(data) => Attachment::Bytes {
                filename: attachment_filename(&self.snapshot_filename, &data),
                data,
            },
            CapturePayload::File(path) => Attachment::Path(path),
        };
        let filename = attachment.filename();
        let mime = detect_mime_type(std::path::Path::new(&filename));
        if !is_inline_safe(mime) {
            warn!(request_id = %request.id, filename = %filename, mime, "Attachment will not render inline");
        }
        if let Err(e) = responder.deliver(&self.messages.success, attachment).await {
            warn!(
                request_id = %request.id,
                kind = %request.kind,
                filename = %filename,
                error = %e,
                "Failed to deliver capture"
            );
            return;
        }
        info!(request_id = %request.id, kind = %request.kind, filename = %filename, mime, "Capture delivered");
    }

    async fn send_reply(&self, responder: &dyn Responder, request: &CaptureRequest, text: &str) {
        if let Err(e) = responder.reply(text).await {
            warn!(request_id = %request.id, kind = %request.kind, error = %e, "Failed to send reply");
        }
    }
}

fn record(request: &CaptureRequest, state: JobState, detail: serde_json::Value) {
    JobLogger::record(JobEvent::new(request, state, detail));
}
