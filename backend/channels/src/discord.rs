use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use bunwatch_commands::{CommandRegistry, RequestCoordinator};
use bunwatch_core::{Attachment, CaptureRequest, Requester, Responder};
use serenity::all::{
    ActivityData, CommandInteraction, CreateAttachment, CreateInteractionResponseFollowup, Http,
    Interaction, Ready,
};
use serenity::prelude::*;
use tracing::{debug, error, info, warn};

use crate::discord_slash::DiscordSlash;
use crate::ChannelAdapter;

/// Answers one slash command interaction: a deferred response, then a
/// follow-up with the result.
pub struct InteractionResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

impl InteractionResponder {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self { http, interaction }
    }

    async fn follow_up(&self, message: CreateInteractionResponseFollowup) -> anyhow::Result<()> {
        self.interaction
            .create_followup(self.http.as_ref(), message)
            .await
            .context("Failed to send follow-up")?;
        Ok(())
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn acknowledge(&self) -> anyhow::Result<()> {
        self.interaction
            .defer(self.http.as_ref())
            .await
            .context("Failed to defer interaction")
    }

    async fn deliver(&self, content: &str, attachment: Attachment) -> anyhow::Result<()> {
        let file = match attachment {
            Attachment::Bytes { data, filename } => CreateAttachment::bytes(data.to_vec(), filename),
            Attachment::Path(path) => CreateAttachment::path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        };
        self.follow_up(CreateInteractionResponseFollowup::new().content(content).add_file(file))
            .await
    }

    async fn reply(&self, text: &str) -> anyhow::Result<()> {
        self.follow_up(CreateInteractionResponseFollowup::new().content(text))
            .await
    }
}

struct Handler {
    coordinator: Arc<RequestCoordinator>,
    registry: CommandRegistry,
    activity: String,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Logged in as {}", ready.user.tag());

        if let Err(e) = DiscordSlash::register_commands(&ctx.http, &self.registry).await {
            error!(error = ?e, "Slash command registration failed");
        }

        ctx.set_activity(Some(ActivityData::watching(self.activity.as_str())));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let Some(kind) = self.registry.resolve(&command.data.name) else {
            debug!(name = %command.data.name, "Ignoring unknown command");
            return;
        };

        let requester = Requester::new(command.user.id.to_string(), command.user.name.clone());
        info!(kind = %kind, user = %requester.name, "Capture requested");

        let request = CaptureRequest::new(kind, requester);
        let responder = InteractionResponder::new(ctx.http.clone(), command);
        let outcome = self.coordinator.handle(request, &responder).await;
        debug!(kind = %kind, state = %outcome.state(), "Interaction handled");
    }
}

/// Long-lived Discord gateway session.
pub struct DiscordAdapter {
    token: String,
    coordinator: Arc<RequestCoordinator>,
    registry: CommandRegistry,
    activity: String,
}

impl DiscordAdapter {
    pub fn new(
        token: String,
        coordinator: Arc<RequestCoordinator>,
        registry: CommandRegistry,
        activity: String,
    ) -> Self {
        Self {
            token,
            coordinator,
            registry,
            activity,
        }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Discord session");

        // Slash commands need no privileged intents.
        let mut client = Client::builder(&self.token, GatewayIntents::empty())
            .event_handler(Handler {
                coordinator: self.coordinator.clone(),
                registry: self.registry.clone(),
                activity: self.activity.clone(),
            })
            .await
            .context("Failed to build Discord client")?;

        if let Err(why) = client.start().await {
            warn!(error = ?why, "Discord client stopped");
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
