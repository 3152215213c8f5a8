//! Config defaults: fills every unset field with its runtime default.

use crate::schema::{
    BunwatchConfig, DiscordConfig, LoggingConfig, SnapshotConfig, StopCondition, StreamConfig,
};

pub const DEFAULT_SNAPSHOT_FILENAME: &str = "creep.jpg";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default clip length (seconds).
pub const DEFAULT_CLIP_LENGTH_SECS: u64 = 5;

/// Default output frame rate.
pub const DEFAULT_FRAME_RATE: u32 = 15;

/// Default watchdog for the capture process; far above the clip length.
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OUTPUT_PATTERN: &str = "clip.gif";

pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

pub const DEFAULT_RTSP_TRANSPORT: &str = "tcp";

pub const DEFAULT_ACTIVITY: &str = "two little idiots";

pub const DEFAULT_SUBJECT: &str = "buns";

pub const DEFAULT_COMMAND_PREFIX: &str = "creep";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: BunwatchConfig) -> BunwatchConfig {
    let config = apply_discord_defaults(config);
    let config = apply_snapshot_defaults(config);
    let config = apply_stream_defaults(config);
    apply_logging_defaults(config)
}

fn apply_discord_defaults(mut config: BunwatchConfig) -> BunwatchConfig {
    let discord = config.discord.get_or_insert_with(DiscordConfig::default);
    discord
        .activity
        .get_or_insert_with(|| DEFAULT_ACTIVITY.to_string());
    discord
        .subject
        .get_or_insert_with(|| DEFAULT_SUBJECT.to_string());
    discord
        .command_prefix
        .get_or_insert_with(|| DEFAULT_COMMAND_PREFIX.to_string());
    config
}

fn apply_snapshot_defaults(mut config: BunwatchConfig) -> BunwatchConfig {
    let snapshot = config.snapshot.get_or_insert_with(SnapshotConfig::default);
    snapshot
        .filename
        .get_or_insert_with(|| DEFAULT_SNAPSHOT_FILENAME.to_string());
    snapshot
        .http_timeout_secs
        .get_or_insert(DEFAULT_HTTP_TIMEOUT_SECS);
    config
}

fn apply_stream_defaults(mut config: BunwatchConfig) -> BunwatchConfig {
    let stream = config.stream.get_or_insert_with(StreamConfig::default);
    stream
        .output_pattern
        .get_or_insert_with(|| DEFAULT_OUTPUT_PATTERN.to_string());
    stream.clip_length_secs.get_or_insert(DEFAULT_CLIP_LENGTH_SECS);
    stream.frame_rate.get_or_insert(DEFAULT_FRAME_RATE);
    stream
        .process_timeout_secs
        .get_or_insert(DEFAULT_PROCESS_TIMEOUT_SECS);
    stream.stop_condition.get_or_insert(StopCondition::default());
    stream
        .ffmpeg_path
        .get_or_insert_with(|| DEFAULT_FFMPEG_PATH.to_string());
    stream
        .rtsp_transport
        .get_or_insert_with(|| DEFAULT_RTSP_TRANSPORT.to_string());
    config
}

fn apply_logging_defaults(mut config: BunwatchConfig) -> BunwatchConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}
