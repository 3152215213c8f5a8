//! CLI Run Command
//!
//! Starts the Discord session and serves capture commands until interrupted.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bunwatch_channels::{ChannelAdapter, DiscordAdapter};
use bunwatch_commands::CommandRegistry;
use bunwatch_config::{validate, BunwatchConfig};
use tracing::info;

use crate::config::build_coordinator;

pub async fn run(config: BunwatchConfig) -> Result<()> {
    let report = validate(&config, true);
    report.log();
    if !report.is_valid() {
        bail!("Configuration has {} error(s)", report.errors.len());
    }

    let token = config
        .discord_token()
        .context("Discord token is not configured")?
        .to_string();
    let presentation = config.presentation();
    let registry = CommandRegistry::new(&presentation);
    let commands: Vec<String> = registry.all().iter().map(|c| c.slash()).collect();
    let coordinator = Arc::new(build_coordinator(&config));

    let adapter = DiscordAdapter::new(token, coordinator, registry, presentation.activity);
    info!(adapter = adapter.name(), commands = ?commands, "Starting Bunwatch");

    tokio::select! {
        result = adapter.start() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}
