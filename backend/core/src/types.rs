use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of capture job. Each kind has its own job guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    /// A single still image fetched over HTTP.
    Snapshot,
    /// A short animated clip recorded from the live stream.
    Clip,
}

impl CaptureKind {
    pub const ALL: [CaptureKind; 2] = [CaptureKind::Snapshot, CaptureKind::Clip];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureKind::Snapshot => "snapshot",
            CaptureKind::Clip => "clip",
        }
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who asked for a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub name: String,
}

impl Requester {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An inbound capture request. Lives only for the duration of one command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub id: Uuid,
    pub kind: CaptureKind,
    pub requested_by: Requester,
    pub issued_at: DateTime<Utc>,
}

impl CaptureRequest {
    pub fn new(kind: CaptureKind, requested_by: Requester) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            requested_by,
            issued_at: Utc::now(),
        }
    }
}

/// Successful capture output, handed to the bot session for delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturePayload {
    /// Raw bytes of a still image, undecoded.
    Image(Bytes),
    /// Path of the file written by the capture process.
    File(PathBuf),
}

impl CapturePayload {
    pub fn describe(&self) -> String {
        match self {
            CapturePayload::Image(bytes) => format!("{} bytes", bytes.len()),
            CapturePayload::File(path) => path.display().to_string(),
        }
    }
}

/// Outcome of a capture: payload or the reason it failed.
pub type CaptureResult = Result<CapturePayload, crate::CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(CaptureKind::Snapshot.to_string(), "snapshot");
        assert_eq!(CaptureKind::Clip.to_string(), "clip");
        let json = serde_json::to_string(&CaptureKind::Clip).unwrap();
        assert_eq!(json, "\"clip\"");
    }

    #[test]
    fn requests_get_distinct_ids() {
        let who = Requester::new("1", "alice");
        let a = CaptureRequest::new(CaptureKind::Snapshot, who.clone());
        let b = CaptureRequest::new(CaptureKind::Snapshot, who);
        assert_ne!(a.id, b.id);
        assert!(a.issued_at <= b.issued_at);
    }

    #[test]
    fn payload_description() {
        let img = CapturePayload::Image(Bytes::from_static(b"abc"));
        assert_eq!(img.describe(), "3 bytes");
        let file = CapturePayload::File(PathBuf::from("/tmp/clip.gif"));
        assert_eq!(file.describe(), "/tmp/clip.gif");
    }
}
