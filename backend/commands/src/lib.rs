pub mod coordinator;
pub mod registry;
pub mod types;

pub use coordinator::{RequestCoordinator, RequestOutcome};
pub use registry::{build_commands, CommandRegistry, CLIP_SUFFIX};
pub use types::{CommandDef, ReplyMessages};
