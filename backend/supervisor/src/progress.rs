//! Capture progress
//!
//! ffmpeg's `-progress pipe:1` writes `key=value` lines in blocks, each block
//! terminated by `progress=continue` or `progress=end`. [`ProgressParser`]
//! turns those lines into [`Progress`] snapshots and a [`ProgressObserver`]
//! decides, per snapshot, whether the capture should keep going.

use std::time::Duration;

use bunwatch_config::CaptureConfig;
use tracing::debug;

/// One progress report from the capture process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub frame: u64,
    pub fps: Option<f64>,
    pub out_time: Option<Duration>,
    pub speed: Option<String>,
    /// `true` on the final block (`progress=end`).
    pub finished: bool,
}

/// Accumulates `key=value` lines until a block completes.
#[derive(Debug, Default)]
pub struct ProgressParser {
    current: Progress,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Returns a snapshot when the line closes a block.
    pub fn feed(&mut self, line: &str) -> Option<Progress> {
        let (key, value) = line.trim().split_once('=')?;
        let value = value.trim();
        match key.trim() {
            "frame" => {
                if let Ok(frame) = value.parse() {
                    self.current.frame = frame;
                }
            }
            "fps" => self.current.fps = value.parse().ok(),
            "out_time_us" | "out_time_ms" => {
                // ffmpeg reports microseconds under both keys.
                if let Ok(us) = value.parse::<u64>() {
                    self.current.out_time = Some(Duration::from_micros(us));
                }
            }
            "speed" => self.current.speed = Some(value.to_string()),
            "progress" => {
                self.current.finished = value == "end";
                return Some(self.current.clone());
            }
            _ => {}
        }
        None
    }
}

/// What a capture should do after a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDecision {
    Continue,
    Stop,
}

/// Called with each progress report of a running capture.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, progress: &Progress) -> ProgressDecision;
}

/// Stops a capture once the observed frame count exceeds a limit.
#[derive(Debug, Clone)]
pub struct FrameCutoff {
    limit: Option<u64>,
    last_frame: u64,
}

impl FrameCutoff {
    pub fn new(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            last_frame: 0,
        }
    }

    /// An observer that never asks to stop.
    pub fn disabled() -> Self {
        Self {
            limit: None,
            last_frame: 0,
        }
    }

    /// Cutoff at `frame_rate * max_duration` when the config counts frames.
    pub fn for_config(config: &CaptureConfig) -> Self {
        if config.stop_condition.uses_frame_count() {
            Self::new(config.frame_count_cutoff())
        } else {
            Self::disabled()
        }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn last_frame(&self) -> u64 {
        self.last_frame
    }
}

impl ProgressObserver for FrameCutoff {
    fn on_progress(&mut self, progress: &Progress) -> ProgressDecision {
        self.last_frame = progress.frame;
        match self.limit {
            Some(limit) if progress.frame > limit => {
                debug!(frame = progress.frame, limit, "Frame cutoff reached");
                ProgressDecision::Stop
            }
            _ => ProgressDecision::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ffmpeg_block() {
        let mut parser = ProgressParser::new();
        let block = "frame=42\nfps=14.9\nstream_0_0_q=-0.0\nout_time_us=2800000\nout_time=00:00:02.800000\nspeed=0.99x\nprogress=continue";
        let mut reports: Vec<Progress> = block.lines().filter_map(|l| parser.feed(l)).collect();
        assert_eq!(reports.len(), 1);
        let p = reports.remove(0);
        assert_eq!(p.frame, 42);
        assert_eq!(p.fps, Some(14.9));
        assert_eq!(p.out_time, Some(Duration::from_millis(2800)));
        assert_eq!(p.speed.as_deref(), Some("0.99x"));
        assert!(!p.finished);
    }

    #[test]
    fn end_block_is_finished() {
        let mut parser = ProgressParser::new();
        assert!(parser.feed("frame=75").is_none());
        let p = parser.feed("progress=end").unwrap();
        assert!(p.finished);
        assert_eq!(p.frame, 75);
    }

    #[test]
    fn ignores_noise() {
        let mut parser = ProgressParser::new();
        assert!(parser.feed("").is_none());
        assert!(parser.feed("not a progress line").is_none());
        assert!(parser.feed("frame=N/A").is_none());
        assert_eq!(parser.feed("progress=continue").unwrap().frame, 0);
    }

    #[test]
    fn cutoff_never_fires_at_or_below_limit() {
        // 5s at 15fps
        let mut cutoff = FrameCutoff::new(75);
        for frame in 0..=75 {
            let p = Progress {
                frame,
                ..Default::default()
            };
            assert_eq!(cutoff.on_progress(&p), ProgressDecision::Continue, "frame {frame}");
        }
        let p = Progress {
            frame: 76,
            ..Default::default()
        };
        assert_eq!(cutoff.on_progress(&p), ProgressDecision::Stop);
        assert_eq!(cutoff.last_frame(), 76);
    }

    #[test]
    fn disabled_cutoff_always_continues() {
        let mut cutoff = FrameCutoff::disabled();
        let p = Progress {
            frame: u64::MAX,
            ..Default::default()
        };
        assert_eq!(cutoff.on_progress(&p), ProgressDecision::Continue);
        assert_eq!(cutoff.limit(), None);
    }
}
