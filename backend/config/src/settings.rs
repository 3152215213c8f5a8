//! Immutable runtime settings derived from a prepared [`BunwatchConfig`].
//!
//! These are built once at start-up and passed explicitly to the components.

use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::*;
use crate::schema::{BunwatchConfig, StopCondition};

/// Everything the stream capture process needs for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub source_url: String,
    /// File name pattern; `{id}` and `{timestamp}` are expanded per capture.
    pub output_pattern: String,
    pub output_dir: PathBuf,
    pub max_duration: Duration,
    pub frame_rate: u32,
    pub stop_condition: StopCondition,
    pub process_timeout: Duration,
    pub ffmpeg_path: String,
    pub rtsp_transport: Option<String>,
}

impl CaptureConfig {
    /// Frame count past which the capture is told to stop.
    pub fn frame_count_cutoff(&self) -> u64 {
        u64::from(self.frame_rate) * self.max_duration.as_secs()
    }
}

/// Settings for the still-image fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSettings {
    pub url: String,
    pub filename: String,
    pub timeout: Duration,
}

/// Display text used only for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub activity: String,
    pub subject: String,
    pub command_prefix: String,
    pub snapshot_filename: String,
}

impl BunwatchConfig {
    /// Clip capture settings, or `None` when no stream source is configured.
    pub fn capture_config(&self) -> Option<CaptureConfig> {
        let stream = self.stream.as_ref()?;
        let source_url = stream.url.clone().filter(|u| !u.is_empty())?;
        Some(CaptureConfig {
            source_url,
            output_pattern: stream
                .output_pattern
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATTERN.to_string()),
            output_dir: stream
                .output_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_duration: Duration::from_secs(
                stream.clip_length_secs.unwrap_or(DEFAULT_CLIP_LENGTH_SECS),
            ),
            frame_rate: stream.frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
            stop_condition: stream.stop_condition.unwrap_or_default(),
            process_timeout: Duration::from_secs(
                stream
                    .process_timeout_secs
                    .unwrap_or(DEFAULT_PROCESS_TIMEOUT_SECS),
            ),
            ffmpeg_path: stream
                .ffmpeg_path
                .clone()
                .unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string()),
            rtsp_transport: stream.rtsp_transport.clone(),
        })
    }

    /// Snapshot settings, or `None` when no still source is configured.
    pub fn snapshot_settings(&self) -> Option<SnapshotSettings> {
        let snapshot = self.snapshot.as_ref()?;
        let url = snapshot.url.clone().filter(|u| !u.is_empty())?;
        Some(SnapshotSettings {
            url,
            filename: snapshot
                .filename
                .clone()
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_FILENAME.to_string()),
            timeout: Duration::from_secs(
                snapshot.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }

    pub fn presentation(&self) -> Presentation {
        let discord = self.discord.as_ref();
        let text = |value: Option<&String>, default: &str| {
            value.cloned().unwrap_or_else(|| default.to_string())
        };
        Presentation {
            activity: text(discord.and_then(|d| d.activity.as_ref()), DEFAULT_ACTIVITY),
            subject: text(discord.and_then(|d| d.subject.as_ref()), DEFAULT_SUBJECT),
            command_prefix: text(
                discord.and_then(|d| d.command_prefix.as_ref()),
                DEFAULT_COMMAND_PREFIX,
            ),
            snapshot_filename: text(
                self.snapshot.as_ref().and_then(|s| s.filename.as_ref()),
                DEFAULT_SNAPSHOT_FILENAME,
            ),
        }
    }

    pub fn discord_token(&self) -> Option<&str> {
        self.discord
            .as_ref()
            .and_then(|d| d.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_ref())
            .map(PathBuf::from)
    }
}
