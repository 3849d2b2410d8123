//! Messaging Gateway
//!
//! The chat transport is an external collaborator; the core consumes it
//! through the [`Gateway`] trait: send text/media with optional inline
//! actions, edit a posted message in place, answer interactive actions and
//! read a chat's administrator list.
//!
//! [`TelegramGateway`] is the production implementation (Bot API over
//! HTTPS, long polling). Tests substitute a recording mock.

pub mod telegram;
pub mod types;

use async_trait::async_trait;
use shared::MediaRef;

use crate::utils::AppResult;
pub use telegram::TelegramGateway;
pub use types::{
    CallbackQuery, Chat, ChatMember, Document, InlineKeyboardButton, InlineKeyboardMarkup,
    KeyboardButton, Message, MessageHandle, PhotoSize, ReplyKeyboardMarkup, ReplyMarkup, Update,
    User, Video,
};

/// Chat transport surface consumed by the core.
///
/// All sends return the [`MessageHandle`] of the posted message so callers
/// can record cross-surface references for later in-place edits.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a text message, optionally with a keyboard.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle>;

    /// Send a media message (photo/video/document by opaque handle) with a
    /// caption.
    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle>;

    /// Upload and send a document from raw bytes (reports, exports).
    async fn send_document_bytes(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> AppResult<MessageHandle>;

    /// Replace a plain message's text (and keyboard; `None` removes it).
    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()>;

    /// Replace a media message's caption (and keyboard; `None` removes it).
    async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()>;

    /// Remove the inline keyboard from a message, leaving content as is.
    async fn clear_markup(&self, chat_id: i64, message_id: i64) -> AppResult<()>;

    /// Acknowledge an interactive action (dismisses the client spinner).
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> AppResult<()>;

    /// User ids of a chat's administrators (authorization checks).
    async fn chat_administrators(&self, chat_id: i64) -> AppResult<Vec<i64>>;
}
