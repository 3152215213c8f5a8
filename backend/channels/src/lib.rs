use async_trait::async_trait;

pub mod discord;
pub mod discord_slash;

pub use discord::{DiscordAdapter, InteractionResponder};
pub use discord_slash::DiscordSlash;

/// A chat platform session that feeds capture requests to the coordinator.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and serve until the session ends.
    async fn start(&self) -> anyhow::Result<()>;
}
