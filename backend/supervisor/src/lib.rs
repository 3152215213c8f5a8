pub mod capture;
pub mod command;
pub mod progress;
pub mod timeout_kill;

pub use capture::{run_capture, CaptureOutcome, CaptureProcessHandle, StreamCapture, DEFAULT_STOP_GRACE};
pub use command::{build_capture_command, expand_output_pattern, output_path, CaptureCommand};
pub use progress::{FrameCutoff, Progress, ProgressDecision, ProgressObserver, ProgressParser};
pub use timeout_kill::TimeoutKill;
