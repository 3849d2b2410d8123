//! Telegram Bot API client
//!
//! Production [`Gateway`] implementation. Plain HTTPS JSON calls with an
//! explicit request timeout; long polling via `getUpdates` uses a longer
//! per-request timeout than the poll horizon.
//!
//! Send/edit failures surface as [`AppError::Gateway`]; the caller decides
//! whether that aborts the operation or is logged and swallowed.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use shared::{MediaKind, MediaRef};

use super::types::{
    ChatMember, InlineKeyboardMarkup, Message, MessageHandle, ReplyMarkup, Update,
};
use super::Gateway;
use crate::utils::{AppError, AppResult};

/// Request timeout for ordinary calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Long-poll horizon passed to `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;
/// Must exceed the poll horizon or every empty poll is an error.
const POLL_REQUEST_TIMEOUT_SECS: u64 = POLL_TIMEOUT_SECS + 20;

/// API response envelope.
#[derive(Debug, serde::Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramGateway {
    client: Client,
    base_url: String,
}

impl TelegramGateway {
    pub fn new(token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Override the API host (tests, local Bot API server).
    pub fn with_base_url(token: &str, host: &str) -> Self {
        let mut gw = Self::new(token);
        gw.base_url = format!("{}/bot{token}", host.trim_end_matches('/'));
        gw
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(method, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let api: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::gateway(format!("{method}: {e}")))?;

        if !api.ok {
            let description = api.description.unwrap_or_else(|| status.to_string());
            return Err(AppError::gateway(format!("{method}: {description}")));
        }
        api.result
            .ok_or_else(|| AppError::gateway(format!("{method}: empty result")))
    }

    /// Fetch the next batch of updates (long polling).
    ///
    /// `offset` is one past the last processed `update_id`.
    pub async fn get_updates(&self, offset: i64) -> AppResult<Vec<Update>> {
        let url = format!("{}/getUpdates", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(POLL_REQUEST_TIMEOUT_SECS))
            .json(&json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }))
            .send()
            .await?;
        Self::handle_response("getUpdates", response).await
    }

    fn handle_of(message: Message) -> MessageHandle {
        MessageHandle {
            chat_id: message.chat.id,
            message_id: message.message_id,
        }
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(&markup)?;
        }
        let message: Message = self.call("sendMessage", &body).await?;
        Ok(Self::handle_of(message))
    }

    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle> {
        let (method, field) = match media.kind {
            MediaKind::Photo => ("sendPhoto", "photo"),
            MediaKind::Video => ("sendVideo", "video"),
            MediaKind::Document => ("sendDocument", "document"),
        };
        let mut body = json!({
            "chat_id": chat_id,
            field: media.file_id,
            "caption": caption,
            "parse_mode": "HTML",
        });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(&markup)?;
        }
        let message: Message = self.call(method, &body).await?;
        Ok(Self::handle_of(message))
    }

    async fn send_document_bytes(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> AppResult<MessageHandle> {
        let url = format!("{}/sendDocument", self.base_url);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::gateway(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let message: Message = Self::handle_response("sendDocument", response).await?;
        Ok(Self::handle_of(message))
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(&markup)?;
        }
        let _: serde_json::Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "caption": caption,
            "parse_mode": "HTML",
        });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(&markup)?;
        }
        let _: serde_json::Value = self.call("editMessageCaption", &body).await?;
        Ok(())
    }

    async fn clear_markup(&self, chat_id: i64, message_id: i64) -> AppResult<()> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reply_markup": { "inline_keyboard": [] },
        });
        let _: serde_json::Value = self.call("editMessageReplyMarkup", &body).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> AppResult<()> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }
        let _: serde_json::Value = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    async fn chat_administrators(&self, chat_id: i64) -> AppResult<Vec<i64>> {
        let body = json!({ "chat_id": chat_id });
        let members: Vec<ChatMember> = self.call("getChatAdministrators", &body).await?;
        Ok(members.into_iter().map(|m| m.user.id).collect())
    }
}
