//! ffmpeg invocation for a clip capture.

use std::path::{Path, PathBuf};

use bunwatch_config::CaptureConfig;
use chrono::Utc;
use uuid::Uuid;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureCommand {
    pub program: String,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl CaptureCommand {
    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Expand `{id}` and `{timestamp}` in an output file pattern.
pub fn expand_output_pattern(pattern: &str, id: Uuid) -> String {
    pattern
        .replace("{id}", &id.simple().to_string())
        .replace("{timestamp}", &Utc::now().format("%Y%m%dT%H%M%S%.3f").to_string())
}

/// Output location for the next capture.
pub fn output_path(config: &CaptureConfig) -> PathBuf {
    config
        .output_dir
        .join(expand_output_pattern(&config.output_pattern, Uuid::new_v4()))
}

fn is_rtsp(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("rtsp://") || lower.starts_with("rtsps://")
}

/// Build the ffmpeg arguments for one capture into `output`.
///
/// Progress goes to stdout (`-progress pipe:1`); stdin stays open so the
/// process can be asked to stop with `q`.
pub fn build_capture_command(config: &CaptureConfig, output: &Path) -> CaptureCommand {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostats", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if is_rtsp(&config.source_url) {
        if let Some(transport) = &config.rtsp_transport {
            args.push("-rtsp_transport".into());
            args.push(transport.clone());
            if transport == "tcp" {
                args.push("-rtsp_flags".into());
                args.push("prefer_tcp".into());
            }
        }
    }

    args.push("-i".into());
    args.push(config.source_url.clone());
    args.push("-vf".into());
    args.push(format!("fps={}", config.frame_rate));

    if config.stop_condition.uses_duration() {
        args.push("-t".into());
        args.push(config.max_duration.as_secs().to_string());
    }

    args.push("-progress".into());
    args.push("pipe:1".into());
    args.push(output.to_string_lossy().into_owned());

    CaptureCommand {
        program: config.ffmpeg_path.clone(),
        args,
        output: output.to_path_buf(),
    }
}
