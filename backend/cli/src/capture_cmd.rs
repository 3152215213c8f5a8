//! One-shot captures from the command line, bypassing Discord.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bunwatch_config::BunwatchConfig;
use bunwatch_core::{CaptureError, CaptureKind, SnapshotSource};
use bunwatch_media::{attachment_filename, SnapshotFetcher};
use bunwatch_supervisor::StreamCapture;

use crate::terminal_output::{note_info, note_success};

/// Fetch one still and write it to `out` (default: the configured filename).
pub async fn snapshot(config: &BunwatchConfig, out: Option<PathBuf>) -> Result<()> {
    let settings = config
        .snapshot_settings()
        .ok_or(CaptureError::ConfigurationMissing(CaptureKind::Snapshot))?;
    let fetcher = SnapshotFetcher::new(settings);

    let data = fetcher.fetch_snapshot().await?;
    let out = out.unwrap_or_else(|| PathBuf::from(attachment_filename(&fetcher.settings().filename, &data)));
    tokio::fs::write(&out, &data)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    note_success(&format!("Wrote {} bytes to {}", data.len(), out.display()));
    Ok(())
}

/// Record one clip and print where it landed.
pub async fn clip(config: &BunwatchConfig) -> Result<()> {
    let capture = StreamCapture::new(
        config
            .capture_config()
            .ok_or(CaptureError::ConfigurationMissing(CaptureKind::Clip))?,
    );

    note_info(&format!(
        "Recording {:?} at {} fps",
        capture.config().max_duration,
        capture.config().frame_rate
    ));
    let outcome = capture.capture().await?;

    note_success(&format!(
        "{} frames in {:.1}s{}",
        outcome.frames,
        outcome.elapsed.as_secs_f64(),
        if outcome.stopped_early { " (frame cutoff)" } else { "" }
    ));
    println!("{}", outcome.path.display());
    Ok(())
}
