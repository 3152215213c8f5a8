//! Structured logging for Bunwatch.
//!
//! Handles subscriber setup (console + rolling JSON file), log redaction, and
//! capture job lifecycle events.

pub mod job_logger;
pub mod logger;
pub mod redact;

pub use job_logger::JobLogger;
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
