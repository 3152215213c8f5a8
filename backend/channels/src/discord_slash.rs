//! Discord Slash Commands
//!
//! Registers the capture commands as global application commands.

use anyhow::{Context as _, Result};
use bunwatch_commands::CommandRegistry;
use serenity::all::{Command, CreateCommand, Http};
use tracing::info;

pub struct DiscordSlash;

impl DiscordSlash {
    /// Builders for every command in the registry. Commands take no options.
    pub fn build(registry: &CommandRegistry) -> Vec<CreateCommand> {
        registry
            .all()
            .iter()
            .map(|def| CreateCommand::new(&def.name).description(&def.description))
            .collect()
    }

    /// Replace the bot's global commands. Returns how many were registered.
    pub async fn register_commands(http: &Http, registry: &CommandRegistry) -> Result<usize> {
        let registered = Command::set_global_commands(http, Self::build(registry))
            .await
            .context("Failed to register slash commands")?;
        info!(count = registered.len(), "Registered slash commands");
        Ok(registered.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunwatch_config::Presentation;

    #[test]
    fn builds_one_command_per_kind() {
        let registry = CommandRegistry::new(&Presentation {
            activity: "two little idiots".into(),
            subject: "buns".into(),
            command_prefix: "creep".into(),
            snapshot_filename: "creep.jpg".into(),
        });
        let commands: Vec<serde_json::Value> = DiscordSlash::build(&registry)
            .iter()
            .map(|c| serde_json::to_value(c).unwrap())
            .collect();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["name"], "creep");
        assert_eq!(commands[0]["description"], "Creep on the buns");
        assert_eq!(commands[1]["name"], "creep-gif");
    }
}
