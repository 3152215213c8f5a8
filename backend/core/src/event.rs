use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CaptureKind, CaptureRequest};

/// A state transition of one capture request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub request_id: Uuid,
    pub kind: CaptureKind,
    pub requested_by: String,
    pub timestamp: DateTime<Utc>,
    pub state: JobState,
    pub detail: serde_json::Value,
}

/// Request lifecycle: `Received → Acknowledged → GuardCheck → Running →
/// Completed`, or one of the terminal `Rejected` / `Failed` states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Received,
    Acknowledged,
    GuardCheck,
    Running,
    Completed,
    Rejected,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Rejected | JobState::Failed)
    }
}

impl JobEvent {
    pub fn new(request: &CaptureRequest, state: JobState, detail: serde_json::Value) -> Self {
        Self {
            request_id: request.id,
            kind: request.kind,
            requested_by: request.requested_by.name.clone(),
            timestamp: Utc::now(),
            state,
            detail,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Requester;

    #[test]
    fn test_event_creation() {
        let request = CaptureRequest::new(CaptureKind::Clip, Requester::new("7", "bob"));
        let event = JobEvent::new(&request, JobState::Running, serde_json::json!({}));
        assert_eq!(event.request_id, request.id);
        assert_eq!(event.kind, CaptureKind::Clip);
        assert_eq!(event.requested_by, "bob");
        assert_eq!(event.state, JobState::Running);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(JobState::GuardCheck.to_string(), "guard_check");
        assert_eq!(JobState::Failed.to_string(), "failed");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Rejected.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(!JobState::Acknowledged.is_terminal());
    }
}
