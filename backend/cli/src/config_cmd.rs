//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked, followed by the
//! validation findings.

use std::path::Path;

use anyhow::{Context, Result};
use bunwatch_commands::CommandRegistry;
use bunwatch_config::{collect_referenced_vars, load_config, redact, validate, BunwatchConfig};

use crate::terminal_output::{note_info, print_report};

pub async fn run(config: &BunwatchConfig, path: &Path) -> Result<()> {
    note_info(&format!("Config file: {}", path.display()));

    let raw = serde_json::to_value(load_config(path).await?).context("Failed to serialize config")?;
    for var in collect_referenced_vars(&raw) {
        note_info(&format!("References ${{{var}}}"));
    }

    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    let rendered = serde_yaml::to_string(&redact(&value)).context("Failed to render config")?;
    println!("{rendered}");

    let registry = CommandRegistry::new(&config.presentation());
    for command in registry.all() {
        note_info(&format!("{} ({}): {}", command.slash(), command.kind, command.description));
    }

    print_report(&validate(config, true));
    Ok(())
}
