use crate::types::{OutgoingContent, TemplateButton};

pub const MENU_TEXT: &str = "*Yehazz MD — Commands*\n\n\
*.menu* - Show this menu\n\
*.sticker* - Reply to an image with .sticker to convert image -> sticker\n\
*.download <url>* - Bot downloads file from URL and sends it\n\
*.sendimg <url>* - Send an image from URL\n\
*.sendvid <url>* - Send a video from URL\n\
*.yt <youtube-url>* - Download audio from YouTube\n\
*.whoami* - Show who invoked the command\n\
*.add <number>* - Add user to group (group only)\n\
*.kick* - Kick mentioned user (group only)\n\
*.promote* / *.demote* - Change admin status of mentioned user\n\
*.ginfo* - Show group info (group only)\n\n\
_Prefix: dot (.)_";

/// Menu as a template message with a website link and quick replies.
pub fn menu_message(bot_name: &str, website: &str) -> OutgoingContent {
    OutgoingContent::Template {
        text: MENU_TEXT.to_string(),
        footer: bot_name.to_string(),
        buttons: vec![
            TemplateButton::Url {
                display_text: "Website".into(),
                url: website.into(),
            },
            TemplateButton::QuickReply {
                display_text: ".menu".into(),
                id: ".menu".into(),
            },
            TemplateButton::QuickReply {
                display_text: ".sticker".into(),
                id: ".sticker".into(),
            },
        ],
    }
}
