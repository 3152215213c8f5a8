//! Stop and kill
//!
//! A capture is stopped in two steps: a graceful request (`q` on stdin, which
//! makes ffmpeg finalize the output and exit), then a hard kill if the
//! process is still alive after the grace period. Watchdog expiry skips
//! straight to the kill.

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tracing::{debug, info, warn};

pub struct TimeoutKill;

impl TimeoutKill {
    /// Ask the process to finish. Closes stdin afterwards. Returns `false`
    /// when stdin was already gone or the write failed.
    pub async fn request_stop(stdin: &mut Option<ChildStdin>, pid: Option<u32>) -> bool {
        let Some(mut pipe) = stdin.take() else {
            debug!(pid = ?pid, "Stop already requested");
            return false;
        };
        info!(pid = ?pid, "Requesting graceful stop");
        match pipe.write_all(b"q\n").await {
            Ok(()) => {
                let _ = pipe.flush().await;
                true
            }
            Err(e) => {
                warn!(pid = ?pid, error = %e, "Failed to write stop request");
                false
            }
        }
    }

    /// Send a kill and reap the child in the background. Returns without
    /// waiting for the exit to be observed.
    pub fn kill(mut child: Child) {
        let pid = child.id();
        if let Err(e) = child.start_kill() {
            warn!(pid = ?pid, error = %e, "Failed to signal capture process");
        }
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(pid = ?pid, status = %status, "Killed capture process reaped"),
                Err(e) => warn!(pid = ?pid, error = %e, "Failed to reap capture process"),
            }
        });
    }
}
