use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bunwatch_commands::RequestCoordinator;
use bunwatch_config::{config_dir, config_file_path, load_and_prepare, BunwatchConfig};
use bunwatch_core::JobGuards;
use bunwatch_media::SnapshotFetcher;
use bunwatch_supervisor::StreamCapture;
use tracing::info;

/// `--config` if given, else `config.yaml` in the Bunwatch config dir.
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Load the file, apply env substitution, overrides and defaults.
pub async fn load(path: &Path) -> Result<BunwatchConfig> {
    load_and_prepare(path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Wire a coordinator with whichever sources the config provides.
pub fn build_coordinator(config: &BunwatchConfig) -> RequestCoordinator {
    let presentation = config.presentation();
    let mut coordinator = RequestCoordinator::new(JobGuards::new())
        .with_snapshot_filename(presentation.snapshot_filename);

    if let Some(settings) = config.snapshot_settings() {
        info!(timeout = ?settings.timeout, "Snapshot source configured");
        coordinator = coordinator.with_snapshot_source(Arc::new(SnapshotFetcher::new(settings)));
    }
    if let Some(capture) = config.capture_config() {
        info!(
            clip_length = ?capture.max_duration,
            frame_rate = capture.frame_rate,
            watchdog = ?capture.process_timeout,
            "Stream source configured"
        );
        coordinator = coordinator.with_clip_source(Arc::new(StreamCapture::new(capture)));
    }

    coordinator
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunwatch_config::parse_config;
    use bunwatch_core::CaptureKind;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_path(Some(PathBuf::from("/etc/bunwatch.yaml")));
        assert_eq!(path, PathBuf::from("/etc/bunwatch.yaml"));
    }

    #[test]
    fn coordinator_only_has_configured_sources() {
        let config = parse_config("snapshot:\n  url: http://cam.local/snap.jpg\n").unwrap();
        let coordinator = build_coordinator(&config);
        assert!(coordinator.is_configured(CaptureKind::Snapshot));
        assert!(!coordinator.is_configured(CaptureKind::Clip));
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(config.presentation().command_prefix, "creep");
    }
}
