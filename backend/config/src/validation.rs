//! Config validation: deep checks with user-friendly messages.

use crate::schema::BunwatchConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding as a structured log event.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config. `require_token` is set when the bot session will be
/// started; one-shot CLI captures do not need Discord credentials.
pub fn validate(config: &BunwatchConfig, require_token: bool) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_discord(config, require_token, &mut report);
    validate_snapshot(config, &mut report);
    validate_stream(config, &mut report);
    report
}

fn validate_discord(config: &BunwatchConfig, require_token: bool, report: &mut ValidationReport) {
    let discord = config.discord.as_ref();
    let token_missing = discord
        .and_then(|d| d.token.as_deref())
        .map(str::is_empty)
        .unwrap_or(true);
    if require_token && token_missing {
        report.error("discord.token", "Discord bot token is required (set DISCORD_TOKEN)");
    }

    if let Some(prefix) = discord.and_then(|d| d.command_prefix.as_deref()) {
        let valid = !prefix.is_empty()
            && prefix.len() <= 28
            && prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            report.error(
                "discord.commandPrefix",
                format!("'{prefix}' is not a valid slash command name (lowercase, digits, '-', '_', at most 28 chars)"),
            );
        }
    }
}

fn validate_snapshot(config: &BunwatchConfig, report: &mut ValidationReport) {
    let Some(snapshot) = &config.snapshot else {
        report.warn("snapshot", "No snapshot source configured; the still command will answer 'not configured'");
        return;
    };
    match snapshot.url.as_deref() {
        None | Some("") => report.warn(
            "snapshot.url",
            "No snapshot source configured; the still command will answer 'not configured'",
        ),
        Some(raw) => match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => report.error(
                "snapshot.url",
                format!("Unsupported scheme '{}'; use http or https", parsed.scheme()),
            ),
            Err(e) => report.error("snapshot.url", format!("Invalid URL: {e}")),
        },
    }
    if snapshot.http_timeout_secs == Some(0) {
        report.error("snapshot.httpTimeoutSecs", "httpTimeoutSecs must be >= 1");
    }
}

fn validate_stream(config: &BunwatchConfig, report: &mut ValidationReport) {
    let Some(stream) = &config.stream else {
        report.warn("stream", "No stream source configured; the clip command will answer 'not configured'");
        return;
    };
    match stream.url.as_deref() {
        None | Some("") => report.warn(
            "stream.url",
            "No stream source configured; the clip command will answer 'not configured'",
        ),
        Some(raw) => {
            if let Err(e) = url::Url::parse(raw) {
                report.error("stream.url", format!("Invalid URL: {e}"));
            }
        }
    }
    if stream.clip_length_secs == Some(0) {
        report.error("stream.clipLengthSecs", "clipLengthSecs must be >= 1");
    }
    if stream.frame_rate == Some(0) {
        report.error("stream.frameRate", "frameRate must be >= 1");
    }
    match (stream.process_timeout_secs, stream.clip_length_secs) {
        (Some(0), _) => report.error("stream.processTimeoutSecs", "processTimeoutSecs must be >= 1"),
        (Some(timeout), Some(length)) if timeout <= length => report.error(
            "stream.processTimeoutSecs",
            format!("Watchdog ({timeout}s) must be longer than the clip ({length}s)"),
        ),
        _ => {}
    }
    if let Some(transport) = stream.rtsp_transport.as_deref() {
        if !matches!(transport, "tcp" | "udp" | "udp_multicast" | "http") {
            report.error(
                "stream.rtspTransport",
                format!("Unknown RTSP transport '{transport}'. Use 'tcp', 'udp', 'udp_multicast' or 'http'"),
            );
        }
    }
}
