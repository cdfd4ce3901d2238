//! Command router.

mod handlers;

use crate::commands::{command_for, Command};
use crate::media::{AudioExtractor, Fetcher};
use crate::messenger::Messenger;
use crate::types::{IncomingMessage, OutgoingContent};
use std::sync::Arc;

/// Identity shown to chat users.
#[derive(Clone, Debug)]
pub struct BotProfile {
    pub name: String,
    /// Target of the menu's "Website" button.
    pub website: String,
}

pub struct Bot {
    profile: BotProfile,
    fetcher: Arc<dyn Fetcher>,
    youtube: Arc<dyn AudioExtractor>,
}

impl Bot {
    pub fn new(
        profile: BotProfile,
        fetcher: Arc<dyn Fetcher>,
        youtube: Arc<dyn AudioExtractor>,
    ) -> Self {
        Self {
            profile,
            fetcher,
            youtube,
        }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    /// Handle a `messages.upsert` batch. Only the first message is looked at.
    pub async fn handle_upsert(&self, messenger: &dyn Messenger, messages: &[IncomingMessage]) {
        if let Some(msg) = messages.first() {
            self.handle_message(messenger, msg).await;
        }
    }

    /// Route one message. Errors are logged, never returned: a failing
    /// command must not take the event loop down.
    pub async fn handle_message(&self, messenger: &dyn Messenger, msg: &IncomingMessage) {
        let Some(command) = command_for(msg) else {
            return;
        };
        tracing::info!(
            chat = %msg.chat(),
            sender = %msg.sender(),
            command = command.name(),
            "command"
        );
        let ctx = Ctx { messenger, msg };
        if let Err(e) = self.dispatch(&ctx, command).await {
            tracing::error!(chat = %msg.chat(), error = %e, "handler error");
        }
    }
}

/// Per-message handler context.
pub(crate) struct Ctx<'a> {
    messenger: &'a dyn Messenger,
    msg: &'a IncomingMessage,
}

impl Ctx<'_> {
    /// Send to the originating chat, quoting the triggering message.
    async fn send(&self, content: OutgoingContent) -> crate::Result<()> {
        self.messenger
            .send(self.msg.chat(), content, Some(self.msg))
            .await?;
        Ok(())
    }

    async fn reply(&self, text: impl Into<String>) -> crate::Result<()> {
        self.send(OutgoingContent::Text(text.into())).await
    }
}

impl Bot {
    async fn dispatch(&self, ctx: &Ctx<'_>, command: Command) -> crate::Result<()> {
        match command {
            Command::Menu => self.menu(ctx).await,
            Command::Whoami => self.whoami(ctx).await,
            Command::Sticker => self.sticker(ctx).await,
            Command::Download(url) => self.download(ctx, url.as_deref()).await,
            Command::SendImage(url) => self.send_image(ctx, url.as_deref()).await,
            Command::SendVideo(url) => self.send_video(ctx, url.as_deref()).await,
            Command::Youtube(url) => self.youtube(ctx, url.as_deref()).await,
            Command::Kick => self.kick(ctx).await,
            Command::Add(number) => self.add(ctx, number.as_deref()).await,
            Command::Promote => self.promote(ctx).await,
            Command::Demote => self.demote(ctx).await,
            Command::GroupInfo => self.group_info(ctx).await,
            Command::Unknown(name) => {
                ctx.reply(format!(
                    "Unknown command: .{name}\nSend .menu to see commands."
                ))
                .await
            }
        }
    }
}
