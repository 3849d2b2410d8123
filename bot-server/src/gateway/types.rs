//! Messaging gateway wire types
//!
//! Serde mappings for the subset of the Bot API this service consumes:
//! inbound updates (text messages, media, interactive actions) and outbound
//! keyboards. Everything else the transport offers is ignored.

use serde::{Deserialize, Serialize};

/// Inbound update envelope (long polling).
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// Chat message (inbound).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub video: Option<Video>,
    #[serde(default)]
    pub document: Option<Document>,
}

impl Message {
    /// Visible message body: text for plain messages, caption for media.
    pub fn body(&self) -> &str {
        self.text
            .as_deref()
            .or(self.caption.as_deref())
            .unwrap_or_default()
    }

    /// True when the message carries media (body lives in the caption).
    pub fn has_media(&self) -> bool {
        self.photo.is_some() || self.video.is_some() || self.document.is_some()
    }

    /// Extract the attached media as a reusable reference. Photos come as
    /// thumbnail variants; the last one is the full-size handle.
    pub fn media_ref(&self) -> Option<shared::MediaRef> {
        use shared::{MediaKind, MediaRef};
        if let Some(photos) = &self.photo {
            let file_id = photos.last()?.file_id.clone();
            return Some(MediaRef {
                kind: MediaKind::Photo,
                file_id,
                mime: "image/jpeg".into(),
            });
        }
        if let Some(video) = &self.video {
            return Some(MediaRef {
                kind: MediaKind::Video,
                file_id: video.file_id.clone(),
                mime: video.mime_type.clone().unwrap_or_else(|| "video/mp4".into()),
            });
        }
        if let Some(document) = &self.document {
            return Some(MediaRef {
                kind: MediaKind::Document,
                file_id: document.file_id.clone(),
                mime: document.mime_type.clone().unwrap_or_default(),
            });
        }
        None
    }
}

/// Interactive-action event (inline button tap).
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }

    /// `@username`, empty when the account has none.
    pub fn handle(&self) -> String {
        self.username
            .as_ref()
            .map(|u| format!("@{u}"))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// "private", "group", "supergroup", "channel"
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

/// Photo thumbnail variant; the largest one is the usable handle.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Administrator list entry (authorization checks).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub user: User,
}

// ========== Outbound keyboards ==========

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn rows(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    pub fn single(button: InlineKeyboardButton) -> Self {
        Self {
            inline_keyboard: vec![vec![button]],
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyboardButton {
    pub text: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

/// Either keyboard kind, attached to an outbound message.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline(InlineKeyboardMarkup),
    Keyboard(ReplyKeyboardMarkup),
}

/// Locator of a posted message, used to edit it afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i64,
}
