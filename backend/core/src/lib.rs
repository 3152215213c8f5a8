pub mod error;
pub mod event;
pub mod guard;
pub mod traits;
pub mod types;

pub use error::CaptureError;
pub use event::{JobEvent, JobState};
pub use guard::{JobGuard, JobGuards, JobPermit};
pub use traits::{Attachment, ClipSource, Responder, SnapshotSource};
pub use types::{CaptureKind, CapturePayload, CaptureRequest, CaptureResult, Requester};
