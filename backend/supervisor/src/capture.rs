//! Stream capture process
//!
//! Runs one external capture (ffmpeg) against the live stream and supervises
//! it until it exits cleanly, is stopped by the frame cutoff, or the watchdog
//! fires. Locking is the caller's job: this module assumes at most one
//! capture runs at a time.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bunwatch_config::{redact_url, CaptureConfig};
use bunwatch_core::{CaptureError, ClipSource};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::command::{build_capture_command, output_path, CaptureCommand};
use crate::progress::{FrameCutoff, ProgressDecision, ProgressObserver, ProgressParser};
use crate::timeout_kill::TimeoutKill;

/// How long a process gets to exit after a graceful stop request.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

const STDERR_TAIL_BYTES: usize = 2048;
const DRAIN_LINE_TIMEOUT: Duration = Duration::from_millis(50);

/// State of one running capture process.
#[derive(Debug, Clone)]
pub struct CaptureProcessHandle {
    pub pid: Option<u32>,
    pub started_at: Instant,
    pub progress_frame_count: u64,
}

/// A finished, usable capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    pub path: PathBuf,
    /// Last frame count reported by the process.
    pub frames: u64,
    /// The frame cutoff asked the process to stop.
    pub stopped_early: bool,
    pub elapsed: Duration,
}

/// Run `command` until it exits, bounded by `watchdog`.
///
/// Each progress report goes to `observer`; on [`ProgressDecision::Stop`] the
/// process is asked to finish and killed if it is still running `grace`
/// later. A watchdog expiry kills the process and fails with
/// [`CaptureError::Timeout`]. Only a clean exit that left the output file
/// behind counts as success.
pub async fn run_capture(
    command: &CaptureCommand,
    observer: &mut dyn ProgressObserver,
    watchdog: Duration,
    grace: Duration,
) -> Result<CaptureOutcome, CaptureError> {
    info!(
        command = %redact_url(&command.display()),
        watchdog = ?watchdog,
        "Starting capture process"
    );

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| CaptureError::Process(format!("failed to start {}: {e}", command.program)))?;

    let mut handle = CaptureProcessHandle {
        pid: child.id(),
        started_at: Instant::now(),
        progress_frame_count: 0,
    };
    let mut stdin = child.stdin.take();
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CaptureError::Process("capture stdout unavailable".into()))?;
    let stderr_task = tokio::spawn(collect_tail(child.stderr.take()));

    let mut lines = BufReader::new(stdout).lines();
    let mut parser = ProgressParser::new();
    let mut stdout_open = true;
    let mut stopped_early = false;
    let mut kill_at: Option<Instant> = None;
    let mut escalated = false;

    let watchdog_sleep = tokio::time::sleep(watchdog);
    tokio::pin!(watchdog_sleep);

    let status = loop {
        tokio::select! {
            _ = &mut watchdog_sleep => {
                warn!(
                    pid = ?handle.pid,
                    frames = handle.progress_frame_count,
                    watchdog = ?watchdog,
                    "Capture exceeded watchdog; killing"
                );
                stderr_task.abort();
                TimeoutKill::kill(child);
                return Err(CaptureError::Timeout(watchdog));
            }
            status = child.wait() => break status?,
            line = lines.next_line(), if stdout_open => match line {
                Ok(Some(line)) => {
                    if let Some(progress) = parser.feed(&line) {
                        handle.progress_frame_count = progress.frame;
                        trace!(pid = ?handle.pid, frame = progress.frame, "Capture progress");
                        if kill_at.is_none() && observer.on_progress(&progress) == ProgressDecision::Stop {
                            stopped_early = true;
                            TimeoutKill::request_stop(&mut stdin, handle.pid).await;
                            kill_at = Some(Instant::now() + grace);
                        }
                    }
                }
                Ok(None) => stdout_open = false,
                Err(e) => {
                    warn!(pid = ?handle.pid, error = %e, "Lost capture progress channel");
                    stdout_open = false;
                }
            },
            _ = sleep_until_opt(kill_at), if !escalated => {
                warn!(pid = ?handle.pid, grace = ?grace, "Capture ignored stop request; killing");
                escalated = true;
                if let Err(e) = child.start_kill() {
                    warn!(pid = ?handle.pid, error = %e, "Failed to signal capture process");
                }
            }
        }
    };

    // Pick up progress written just before exit.
    while stdout_open {
        match tokio::time::timeout(DRAIN_LINE_TIMEOUT, lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                if let Some(progress) = parser.feed(&line) {
                    handle.progress_frame_count = progress.frame;
                }
            }
            _ => stdout_open = false,
        }
    }

    let stderr_tail = tokio::time::timeout(Duration::from_secs(1), stderr_task)
        .await
        .ok()
        .and_then(Result::ok)
        .unwrap_or_default();
    let elapsed = handle.started_at.elapsed();

    if escalated {
        warn!(pid = ?handle.pid, status = %status, "Capture killed after stop request");
        return Err(CaptureError::Process(format!(
            "did not exit within {grace:?} of the stop request"
        )));
    }

    if !status.success() {
        warn!(
            pid = ?handle.pid,
            status = %status,
            stderr = %redact_url(&stderr_tail),
            "Capture process failed"
        );
        return Err(CaptureError::Process(format!(
            "exited with {status}: {}",
            redact_url(&stderr_tail)
        )));
    }

    if !tokio::fs::try_exists(&command.output).await.unwrap_or(false) {
        return Err(CaptureError::Process(format!(
            "exited cleanly but produced no output at {}",
            command.output.display()
        )));
    }

    info!(
        pid = ?handle.pid,
        frames = handle.progress_frame_count,
        stopped_early,
        elapsed_ms = elapsed.as_millis() as u64,
        output = %command.output.display(),
        "Capture finished"
    );

    Ok(CaptureOutcome {
        path: command.output.clone(),
        frames: handle.progress_frame_count,
        stopped_early,
        elapsed,
    })
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn collect_tail(stderr: Option<ChildStderr>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = stderr.read_to_end(&mut buf).await;
    let start = buf.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&buf[start..]).trim().to_string()
}

/// Make sure the output directory exists and no stale file is left behind.
async fn prepare_output(output: &Path) -> Result<(), CaptureError> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!(output = %output.display(), "Removed previous capture output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// [`ClipSource`] that records clips with ffmpeg.
pub struct StreamCapture {
    config: CaptureConfig,
    stop_grace: Duration,
}

impl StreamCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Record one clip, stopping at the configured frame cutoff.
    pub async fn capture(&self) -> Result<CaptureOutcome, CaptureError> {
        let mut observer = FrameCutoff::for_config(&self.config);
        self.capture_with_observer(&mut observer).await
    }

    /// Record one clip with a caller-supplied progress observer.
    pub async fn capture_with_observer(
        &self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<CaptureOutcome, CaptureError> {
        let output = output_path(&self.config);
        prepare_output(&output).await?;
        let command = build_capture_command(&self.config, &output);
        run_capture(&command, observer, self.config.process_timeout, self.stop_grace).await
    }
}

#[async_trait]
impl ClipSource for StreamCapture {
    async fn capture_clip(&self) -> Result<PathBuf, CaptureError> {
        self.capture().await.map(|outcome| outcome.path)
    }
}
