use super::{Bot, Ctx};
use crate::commands::menu_message;
use crate::error::MediaError;
use crate::media::{image_to_sticker, mime_ext, youtube};
use crate::types::{Jid, OutgoingContent, ParticipantAction};
use crate::Result;

const GROUP_ONLY: &str = "Group only command";

impl Bot {
    pub(super) async fn menu(&self, ctx: &Ctx<'_>) -> Result<()> {
        ctx.send(menu_message(&self.profile.name, &self.profile.website))
            .await
    }

    pub(super) async fn whoami(&self, ctx: &Ctx<'_>) -> Result<()> {
        ctx.reply(format!(
            "You: {}\nChat: {}\nBot: {}",
            ctx.msg.sender(),
            ctx.msg.chat(),
            self.profile.name
        ))
        .await
    }

    pub(super) async fn sticker(&self, ctx: &Ctx<'_>) -> Result<()> {
        if ctx.msg.image_for_sticker().is_none() {
            return ctx
                .reply("Reply to an image with `.sticker` or send an image with `.sticker` caption.")
                .await;
        }
        let image = ctx.messenger.download_media(ctx.msg).await?;
        match image_to_sticker(image).await {
            Ok(webp) => ctx.send(OutgoingContent::Sticker(webp.into())).await,
            Err(e) => ctx.reply(format!("Failed to create sticker: {e}")).await,
        }
    }

    pub(super) async fn download(&self, ctx: &Ctx<'_>, url: Option<&str>) -> Result<()> {
        let Some(url) = url else {
            return ctx.reply("Usage: .download <url>").await;
        };
        ctx.reply("Downloading, please wait...").await?;
        if let Err(e) = self.relay_download(ctx, url).await {
            ctx.reply(format!("Download failed: {e}")).await?;
        }
        Ok(())
    }

    async fn relay_download(&self, ctx: &Ctx<'_>, url: &str) -> Result<()> {
        let fetched = self.fetcher.fetch(url).await?;
        let caption = Some(format!("Downloaded file ({url})"));
        let content = if fetched.is_image() {
            OutgoingContent::Image {
                data: fetched.body,
                caption,
            }
        } else if fetched.is_video() {
            OutgoingContent::Video {
                data: fetched.body,
                caption,
            }
        } else {
            OutgoingContent::Document {
                file_name: format!("file.{}", mime_ext::extension_for(&fetched.content_type)),
                mimetype: fetched.content_type,
                data: fetched.body,
            }
        };
        ctx.send(content).await
    }

    pub(super) async fn send_image(&self, ctx: &Ctx<'_>, url: Option<&str>) -> Result<()> {
        let Some(url) = url else {
            return ctx.reply("Usage: .sendimg <image-url>").await;
        };
        ctx.reply("Fetching image...").await?;
        if let Err(e) = self.relay_image(ctx, url).await {
            ctx.reply(format!("Failed to send image: {e}")).await?;
        }
        Ok(())
    }

    async fn relay_image(&self, ctx: &Ctx<'_>, url: &str) -> Result<()> {
        let fetched = self.fetcher.fetch(url).await?;
        ctx.send(OutgoingContent::Image {
            data: fetched.body,
            caption: Some(format!("Image from {url}")),
        })
        .await
    }

    pub(super) async fn send_video(&self, ctx: &Ctx<'_>, url: Option<&str>) -> Result<()> {
        let Some(url) = url else {
            return ctx.reply("Usage: .sendvid <video-url>").await;
        };
        ctx.reply("Fetching video (may be large) ...").await?;
        if let Err(e) = self.relay_video(ctx, url).await {
            ctx.reply(format!("Failed to send video: {e}")).await?;
        }
        Ok(())
    }

    async fn relay_video(&self, ctx: &Ctx<'_>, url: &str) -> Result<()> {
        let fetched = self.fetcher.fetch(url).await?;
        ctx.send(OutgoingContent::Video {
            data: fetched.body,
            caption: Some(format!("Video from {url}")),
        })
        .await
    }

    pub(super) async fn youtube(&self, ctx: &Ctx<'_>, url: Option<&str>) -> Result<()> {
        let Some(url) = url else {
            return ctx.reply("Usage: .yt <youtube-url>").await;
        };
        ctx.reply("Downloading audio, please wait...").await?;
        if let Err(e) = self.relay_audio(ctx, url).await {
            ctx.reply(format!("Failed to download audio: {e}")).await?;
        }
        Ok(())
    }

    async fn relay_audio(&self, ctx: &Ctx<'_>, url: &str) -> Result<()> {
        if !youtube::validate_url(url) {
            return Err(MediaError::InvalidYoutubeUrl.into());
        }
        let info = self.youtube.info(url).await?;
        let data = self.youtube.audio(url).await?;
        ctx.send(OutgoingContent::Audio {
            data,
            mimetype: "audio/mpeg".into(),
            file_name: info.audio_file_name(),
        })
        .await
    }

    pub(super) async fn kick(&self, ctx: &Ctx<'_>) -> Result<()> {
        if !ctx.msg.chat().is_group() {
            return ctx.reply(GROUP_ONLY).await;
        }
        let mentioned = ctx.msg.mentioned();
        if mentioned.is_empty() {
            return ctx.reply("Tag the user you want to kick").await;
        }
        ctx.messenger
            .group_participants_update(ctx.msg.chat(), mentioned, ParticipantAction::Remove)
            .await
    }

    pub(super) async fn add(&self, ctx: &Ctx<'_>, number: Option<&str>) -> Result<()> {
        if !ctx.msg.chat().is_group() {
            return ctx.reply(GROUP_ONLY).await;
        }
        let Some(number) = number else {
            return ctx.reply("Example: .add 9477xxxxxxx").await;
        };
        ctx.messenger
            .group_participants_update(ctx.msg.chat(), &[Jid::user(number)], ParticipantAction::Add)
            .await
    }

    pub(super) async fn promote(&self, ctx: &Ctx<'_>) -> Result<()> {
        self.change_admin(ctx, ParticipantAction::Promote, "Tag a user to promote")
            .await
    }

    pub(super) async fn demote(&self, ctx: &Ctx<'_>) -> Result<()> {
        self.change_admin(ctx, ParticipantAction::Demote, "Tag a user to demote")
            .await
    }

    // No group check here: outside a group the library call fails and is logged.
    async fn change_admin(
        &self,
        ctx: &Ctx<'_>,
        action: ParticipantAction,
        usage: &str,
    ) -> Result<()> {
        let mentioned = ctx.msg.mentioned();
        if mentioned.is_empty() {
            return ctx.reply(usage).await;
        }
        ctx.messenger
            .group_participants_update(ctx.msg.chat(), mentioned, action)
            .await
    }

    pub(super) async fn group_info(&self, ctx: &Ctx<'_>) -> Result<()> {
        let chat = ctx.msg.chat();
        if !chat.is_group() {
            return ctx.reply(GROUP_ONLY).await;
        }
        let meta = ctx.messenger.group_metadata(chat).await?;
        ctx.reply(format!(
            "*Group Info*\nName: {}\nMembers: {}\nID: {}",
            meta.subject,
            meta.participants.len(),
            chat
        ))
        .await
    }
}
