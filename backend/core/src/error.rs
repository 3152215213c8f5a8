use std::time::Duration;

use thiserror::Error;

use crate::types::CaptureKind;

/// Every way a capture request can end without a payload.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{0} source is not configured")]
    ConfigurationMissing(CaptureKind),

    #[error("a {0} job is already in progress")]
    AlreadyInProgress(CaptureKind),

    #[error("fetch failed: {status} {reason}")]
    Fetch { status: u16, reason: String },

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("capture process failed: {0}")]
    Process(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// Short machine-friendly label used in structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            CaptureError::ConfigurationMissing(_) => "configuration_missing",
            CaptureError::AlreadyInProgress(_) => "already_in_progress",
            CaptureError::Fetch { .. } => "fetch_failure",
            CaptureError::Timeout(_) => "timeout",
            CaptureError::Process(_) => "process_failure",
            CaptureError::Transport(_) => "transport",
            CaptureError::Io(_) => "io",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CaptureError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_mentions_status() {
        let err = CaptureError::Fetch {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "fetch failed: 404 Not Found");
        assert_eq!(err.label(), "fetch_failure");
        assert!(!err.is_timeout());
    }

    #[test]
    fn configuration_missing_names_kind() {
        let err = CaptureError::ConfigurationMissing(CaptureKind::Snapshot);
        assert_eq!(err.to_string(), "snapshot source is not configured");
    }
}
