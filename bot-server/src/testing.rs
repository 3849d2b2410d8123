//! In-memory test doubles shared across module tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use shared::complaint::columns;
use shared::MediaRef;

use crate::gateway::{Gateway, InlineKeyboardMarkup, MessageHandle, ReplyMarkup};
use crate::store::RecordStore;
use crate::utils::{AppError, AppResult};

/// In-memory [`RecordStore`] holding rows as a plain table. Row 1 is the
/// header, matching the sheet addressing.
#[derive(Default)]
pub struct MemStore {
    rows: Mutex<Vec<Vec<String>>>,
    header_writes: Mutex<usize>,
    /// When set, every mutating call fails with a store error.
    pub fail_writes: AtomicBool,
}

impl MemStore {
    pub fn with_header<S: Into<String>>(header: Vec<S>) -> Self {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        Self {
            rows: Mutex::new(vec![header]),
            ..Self::default()
        }
    }

    /// Store seeded with the expected complaint schema.
    pub fn schema() -> Self {
        Self::with_header(columns::EXPECTED.to_vec())
    }

    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().await.clone()
    }

    pub async fn write_header_calls(&self) -> usize {
        *self.header_writes.lock().await
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::store("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn read_header(&self) -> AppResult<Vec<String>> {
        Ok(self.rows.lock().await.first().cloned().unwrap_or_default())
    }

    async fn write_header(&self, header: &[String]) -> AppResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        if rows.is_empty() {
            rows.push(header.to_vec());
        } else {
            rows[0] = header.to_vec();
        }
        *self.header_writes.lock().await += 1;
        Ok(())
    }

    async fn append_row(&self, row: &[String]) -> AppResult<()> {
        self.check_writable()?;
        self.rows.lock().await.push(row.to_vec());
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<Vec<String>>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn read_column(&self, col: usize) -> AppResult<Vec<String>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .map(|r| r.get(col).cloned().unwrap_or_default())
            .collect())
    }

    async fn update_cells(&self, row: usize, values: &[(usize, String)]) -> AppResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let target = rows
            .get_mut(row - 1)
            .ok_or_else(|| AppError::store(format!("no row {row}")))?;
        for (col, value) in values {
            if target.len() <= *col {
                target.resize(col + 1, String::new());
            }
            target[*col] = value.clone();
        }
        Ok(())
    }
}

/// One outbound message captured by [`MockGateway`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub has_markup: bool,
    pub media: Option<MediaRef>,
}

/// One in-place edit captured by [`MockGateway`].
#[derive(Debug, Clone)]
pub struct Edit {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub has_markup: bool,
}

/// Recording [`Gateway`]. Sends succeed with incrementing message ids
/// unless `fail_sends` is raised.
#[derive(Default)]
pub struct MockGateway {
    pub sent: Mutex<Vec<SentMessage>>,
    pub edits: Mutex<Vec<Edit>>,
    pub cleared: Mutex<Vec<(i64, i64)>>,
    pub callbacks: Mutex<Vec<(String, Option<String>)>>,
    pub documents: Mutex<Vec<(i64, String, Vec<u8>)>>,
    pub admins: Vec<i64>,
    pub fail_sends: AtomicBool,
    next_message_id: AtomicI64,
}

impl MockGateway {
    pub fn with_admins(admins: Vec<i64>) -> Self {
        Self {
            admins,
            ..Self::default()
        }
    }

    pub async fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }

    fn next_handle(&self, chat_id: i64) -> AppResult<MessageHandle> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::gateway("injected send failure"));
        }
        Ok(MessageHandle {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 100,
        })
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle> {
        let handle = self.next_handle(chat_id)?;
        self.sent.lock().await.push(SentMessage {
            chat_id,
            text: text.to_string(),
            has_markup: markup.is_some(),
            media: None,
        });
        Ok(handle)
    }

    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageHandle> {
        let handle = self.next_handle(chat_id)?;
        self.sent.lock().await.push(SentMessage {
            chat_id,
            text: caption.to_string(),
            has_markup: markup.is_some(),
            media: Some(media.clone()),
        });
        Ok(handle)
    }

    async fn send_document_bytes(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        _caption: &str,
    ) -> AppResult<MessageHandle> {
        let handle = self.next_handle(chat_id)?;
        self.documents
            .lock()
            .await
            .push((chat_id, file_name.to_string(), bytes));
        Ok(handle)
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        self.edits.lock().await.push(Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            has_markup: markup.is_some(),
        });
        Ok(())
    }

    async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        self.edit_text(chat_id, message_id, caption, markup).await
    }

    async fn clear_markup(&self, chat_id: i64, message_id: i64) -> AppResult<()> {
        self.cleared.lock().await.push((chat_id, message_id));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> AppResult<()> {
        self.callbacks
            .lock()
            .await
            .push((callback_id.to_string(), text.map(String::from)));
        Ok(())
    }

    async fn chat_administrators(&self, _chat_id: i64) -> AppResult<Vec<i64>> {
        Ok(self.admins.clone())
    }
}

/// Seed one complaint row with the given status.
pub async fn seed_complaint(
    repo: &crate::store::ComplaintRepository,
    id: &str,
    status: shared::ComplaintStatus,
) {
    seed_complaint_at(repo, id, status, "01.01.2025 10:00").await;
}

pub async fn seed_complaint_at(
    repo: &crate::store::ComplaintRepository,
    id: &str,
    status: shared::ComplaintStatus,
    created_at: &str,
) {
    repo.create(&crate::store::NewComplaint {
        id: id.into(),
        created_at: created_at.into(),
        branch: "Ганга".into(),
        parent_name: "Иванова Анна".into(),
        student_name: "Иванов Тимур".into(),
        phone: "+998911234567".into(),
        category: "Другое".into(),
        description: "Описание жалобы".into(),
        status: status.as_str().into(),
        sender: "Aziz T @aziz".into(),
        sender_user_id: "500".into(),
    })
    .await
    .unwrap();
}
