use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CaptureError;

/// Something that can produce a still image on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Bytes, CaptureError>;
}

/// Something that can record a short clip from the live stream.
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Record a clip and return the path of the produced file.
    async fn capture_clip(&self) -> Result<PathBuf, CaptureError>;
}

/// The caller side of one inbound request, as seen by the coordinator.
///
/// Implemented by the bot session for a live interaction; tests provide
/// recording implementations.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Tell the caller the request was received and work is under way.
    async fn acknowledge(&self) -> Result<()>;

    /// Deliver the final media payload along with a short caption.
    async fn deliver(&self, content: &str, attachment: Attachment) -> Result<()>;

    /// Send a plain-text final response.
    async fn reply(&self, text: &str) -> Result<()>;
}

/// A file to attach to the final response.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Bytes { data: Bytes, filename: String },
    Path(PathBuf),
}

impl Attachment {
    pub fn filename(&self) -> String {
        match self {
            Attachment::Bytes { filename, .. } => filename.clone(),
            Attachment::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}
