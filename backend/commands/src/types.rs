/// Slash command types.
use bunwatch_core::CaptureKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// One slash command the bot registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDef {
    /// Command name without the leading slash (e.g. "creep", "creep-gif").
    pub name: String,
    pub description: String,
    pub kind: CaptureKind,
}

impl CommandDef {
    pub fn slash(&self) -> String {
        format!("/{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Final response texts shown to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessages {
    /// Caption sent with a delivered attachment.
    pub success: String,
    pub rejected: String,
    pub snapshot_failed: String,
    pub clip_failed: String,
    pub not_configured: String,
}

impl ReplyMessages {
    /// Generic failure text for a kind. Never carries error details.
    pub fn failure(&self, kind: CaptureKind) -> &str {
        match kind {
            CaptureKind::Snapshot => &self.snapshot_failed,
            CaptureKind::Clip => &self.clip_failed,
        }
    }
}

impl Default for ReplyMessages {
    fn default() -> Self {
        Self {
            success: "👀".into(),
            rejected: "Already working on one, try again in a moment.".into(),
            snapshot_failed: "Failed to fetch image. Please try again later.".into(),
            clip_failed: "Failed to capture clip. Please try again later.".into(),
            not_configured: "That command isn't configured.".into(),
        }
    }
}
