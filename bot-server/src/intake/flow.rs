//! Guided intake flow
//!
//! Drives a draft through the form steps, renders the preview, and on
//! confirmation performs the store-first submission: the record row is
//! written before anything is announced to the intake group.

use std::sync::Arc;
use std::time::Duration;

use shared::{BRANCHES, Category, CallbackPayload, MediaKind, MediaRef, ComplaintStatus, Submitter};

use crate::core::AppState;
use crate::gateway::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup,
};
use crate::intake::session::FormStep;
use crate::store::NewComplaint;
use crate::utils::time::{fallback_id_suffix, now_display};
use crate::utils::validation::{normalize_optional, normalize_phone, validate_min_text};
use crate::utils::AppResult;

pub const MENU_NEW_COMPLAINT: &str = "📋 Новая жалоба";
pub const MENU_INSTRUCTION: &str = "📘 Инструкция по использованию";
pub const MENU_STATISTICS: &str = "📊 Статистика";

/// Typed at the media step instead of pressing the skip button.
const SKIP_SYNONYMS: [&str; 5] = ["пропустить", "skip", "⏭", "нет", "-"];

/// Persistent main menu shown in private chats.
pub fn main_menu() -> ReplyMarkup {
    ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
        keyboard: vec![
            vec![KeyboardButton::new(MENU_NEW_COMPLAINT)],
            vec![KeyboardButton::new(MENU_INSTRUCTION)],
            vec![KeyboardButton::new(MENU_STATISTICS)],
        ],
        resize_keyboard: true,
    })
}

fn branches_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(
        BRANCHES
            .iter()
            .map(|b| {
                vec![InlineKeyboardButton::new(
                    *b,
                    CallbackPayload::Branch((*b).to_string()).encode(),
                )]
            })
            .collect(),
    )
}

fn categories_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(
        Category::ALL
            .iter()
            .map(|c| {
                vec![InlineKeyboardButton::new(
                    c.title(),
                    CallbackPayload::Category(c.code().to_string()).encode(),
                )]
            })
            .collect(),
    )
}

fn media_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(vec![
        vec![
            InlineKeyboardButton::new("📸 Добавить фото", CallbackPayload::AddPhoto.encode()),
            InlineKeyboardButton::new("🎥 Добавить видео", CallbackPayload::AddVideo.encode()),
        ],
        vec![InlineKeyboardButton::new(
            "⏭ Пропустить",
            CallbackPayload::SkipMedia.encode(),
        )],
    ])
}

fn confirm_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(vec![
        vec![InlineKeyboardButton::new(
            "✅ Отправить",
            CallbackPayload::ConfirmSend.encode(),
        )],
        vec![InlineKeyboardButton::new(
            "✏️ Изменить анкету",
            CallbackPayload::EditForm.encode(),
        )],
    ])
}

/// `/start`: greeting plus the persistent menu.
pub async fn cmd_start(state: &AppState, chat_id: i64) -> AppResult<()> {
    state
        .gateway
        .send_message(
            chat_id,
            "👋 Привет! Это бот фиксации жалоб.\nНажми «📋 Новая жалоба», чтобы начать.",
            Some(main_menu()),
        )
        .await?;
    Ok(())
}

/// Send the usage-guide document.
pub async fn send_instruction(state: &AppState, chat_id: i64) -> AppResult<()> {
    match tokio::fs::read(&state.config.instruction_file).await {
        Ok(bytes) => {
            let name = std::path::Path::new(&state.config.instruction_file)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "instruction.pdf".to_string());
            state
                .gateway
                .send_document_bytes(
                    chat_id,
                    &name,
                    bytes,
                    "📘 Пожалуйста, ознакомьтесь с инструкцией перед использованием бота.",
                )
                .await?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Instruction file unavailable");
            state
                .gateway
                .send_message(chat_id, "⚠️ Ошибка при отправке файла.", None)
                .await?;
        }
    }
    Ok(())
}

/// Begin a fresh form at the branch step.
pub async fn start_form(state: &AppState, user_id: i64, chat_id: i64) -> AppResult<()> {
    state.sessions.start(user_id);
    state
        .gateway
        .send_message(
            chat_id,
            "🏫 Выберите филиал:",
            Some(ReplyMarkup::Inline(branches_keyboard())),
        )
        .await?;
    Ok(())
}

/// Branch button pressed.
pub async fn branch_selected(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    branch: &str,
) -> AppResult<()> {
    if state.sessions.step_of(user_id) != Some(FormStep::Branch) {
        return Ok(());
    }
    state.sessions.update(user_id, |d| {
        d.branch = branch.to_string();
        d.step = FormStep::ParentName;
    });
    state
        .gateway
        .send_message(
            chat_id,
            "👩‍👦 Введите ФИО родителя (или оставьте '-' если нет):",
            None,
        )
        .await?;
    Ok(())
}

/// Category button pressed.
pub async fn category_selected(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    code: &str,
) -> AppResult<()> {
    if state.sessions.step_of(user_id) != Some(FormStep::Category) {
        return Ok(());
    }
    let category = Category::from_code(code);
    state.sessions.update(user_id, |d| {
        d.category = category.title().to_string();
        d.step = FormStep::Description;
    });
    state
        .gateway
        .send_message(chat_id, "📝 Опишите суть жалобы (минимум 3 символа):", None)
        .await?;
    Ok(())
}

/// A plain text message while a form is active. Returns `false` when the
/// user has no draft (the dispatcher then ignores the message).
pub async fn text_input(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    text: &str,
) -> AppResult<bool> {
    let Some(step) = state.sessions.step_of(user_id) else {
        return Ok(false);
    };

    match step {
        FormStep::ParentName => {
            let value = normalize_optional(text);
            state.sessions.update(user_id, |d| {
                d.parent_name = value;
                d.step = FormStep::StudentName;
            });
            state
                .gateway
                .send_message(
                    chat_id,
                    "🧒 Введите ФИО ученика и класс (или оставьте '-' если нет):",
                    None,
                )
                .await?;
        }
        FormStep::StudentName => {
            let value = normalize_optional(text);
            state.sessions.update(user_id, |d| {
                d.student_name = value;
                d.step = FormStep::Phone;
            });
            state
                .gateway
                .send_message(chat_id, "📞 Введите номер телефона родителя:", None)
                .await?;
        }
        FormStep::Phone => match normalize_phone(text) {
            Ok(phone) => {
                state.sessions.update(user_id, |d| {
                    d.phone = phone;
                    d.step = FormStep::Category;
                });
                state
                    .gateway
                    .send_message(
                        chat_id,
                        "📂 Выберите категорию жалобы:",
                        Some(ReplyMarkup::Inline(categories_keyboard())),
                    )
                    .await?;
            }
            Err(_) => {
                // re-prompt without advancing
                state
                    .gateway
                    .send_message(
                        chat_id,
                        "❌ Неправильный номер. Введите корректный телефон (например: 91 123 4567 или +998911234567).",
                        None,
                    )
                    .await?;
            }
        },
        FormStep::Description => match validate_min_text(text, "жалоба") {
            Ok(description) => {
                state.sessions.update(user_id, |d| {
                    d.description = description;
                    d.step = FormStep::Media;
                });
                state
                    .gateway
                    .send_message(
                        chat_id,
                        "📎 Хотите прикрепить фото или видео к жалобе?",
                        Some(ReplyMarkup::Inline(media_keyboard())),
                    )
                    .await?;
            }
            Err(_) => {
                state
                    .gateway
                    .send_message(
                        chat_id,
                        "❌ Пожалуйста, опишите жалобу подробнее (минимум 3 символа).",
                        None,
                    )
                    .await?;
            }
        },
        FormStep::Media => {
            if SKIP_SYNONYMS.contains(&text.trim().to_lowercase().as_str()) {
                state.sessions.update(user_id, |d| d.awaiting_media = None);
                show_preview(state, user_id, chat_id).await?;
            } else {
                state
                    .gateway
                    .send_message(
                        chat_id,
                        "⚠️ Сейчас бот ждёт медиа (фото/видео) или нажмите «⏭ Пропустить». Чтобы изменить текст жалобы — сначала нажмите «✏️ Изменить анкету».",
                        None,
                    )
                    .await?;
            }
        }
        // text during keyboard-driven or preview steps is ignored
        FormStep::Branch | FormStep::Category | FormStep::Preview => {}
    }
    Ok(true)
}

/// "Add photo" / "add video" pressed at the media step.
pub async fn media_prompt(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    kind: MediaKind,
) -> AppResult<()> {
    if state.sessions.step_of(user_id) != Some(FormStep::Media) {
        return Ok(());
    }
    state.sessions.update(user_id, |d| d.awaiting_media = Some(kind));
    let prompt = match kind {
        MediaKind::Photo => "📸 Отправьте фото, которое нужно прикрепить к жалобе:",
        _ => "🎥 Отправьте видео, которое нужно прикрепить к жалобе:",
    };
    state.gateway.send_message(chat_id, prompt, None).await?;
    Ok(())
}

/// Skip button pressed. Guarded against a fast double press.
pub async fn skip_media(state: Arc<AppState>, user_id: i64, chat_id: i64) -> AppResult<()> {
    if state.sessions.step_of(user_id) != Some(FormStep::Media) {
        return Ok(());
    }
    if !state.guards.arm_skip(user_id) {
        return Ok(());
    }
    state.sessions.update(user_id, |d| d.awaiting_media = None);
    show_preview(&state, user_id, chat_id).await?;

    let guard_state = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        guard_state.guards.disarm_skip(user_id);
    });
    Ok(())
}

/// Media arrived at the media step.
pub async fn media_received(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    media: MediaRef,
) -> AppResult<()> {
    let Some(draft) = state.sessions.get(user_id) else {
        return Ok(());
    };
    if draft.step != FormStep::Media || draft.awaiting_media.is_none() {
        state
            .gateway
            .send_message(
                chat_id,
                "⚠️ Чтобы прикрепить медиа к жалобе, нажмите соответствующую кнопку.",
                None,
            )
            .await?;
        return Ok(());
    }

    state.sessions.update(user_id, |d| {
        d.media = Some(media);
        d.awaiting_media = None;
    });
    state
        .gateway
        .send_message(chat_id, "✅ Медиа добавлено.", None)
        .await?;
    show_preview(state, user_id, chat_id).await?;
    Ok(())
}

/// "Edit" on the preview: discard everything and restart at the branch
/// step.
pub async fn edit_form(state: &AppState, user_id: i64, chat_id: i64) -> AppResult<()> {
    state.sessions.start(user_id);
    state
        .gateway
        .send_message(
            chat_id,
            "🔁 Хорошо, начнём заполнение анкеты заново.\n\n🏫 Выберите филиал:",
            Some(ReplyMarkup::Inline(branches_keyboard())),
        )
        .await?;
    Ok(())
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() { "—" } else { value }
}

/// Render the preview, assigning the complaint id.
async fn show_preview(state: &AppState, user_id: i64, chat_id: i64) -> AppResult<()> {
    let Some(mut draft) = state.sessions.get(user_id) else {
        return Ok(());
    };

    // id generation failure falls back to a timestamp-derived id
    let id = match state.repo.next_id().await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Id generation failed, using timestamp fallback");
            format!("A-{}", fallback_id_suffix(state.config.timezone))
        }
    };
    state.sessions.update(user_id, |d| {
        d.id = Some(id.clone());
        d.step = FormStep::Preview;
    });
    draft.id = Some(id);

    let preview = format!(
        "<b>📋 Проверьте данные жалобы:</b>\n\n\
         🏫 Филиал: {}\n\
         👤 Родитель: {}\n\
         🧒 Ученик: {}\n\
         ☎️ Телефон: {}\n\
         📂 Категория: {}\n\
         ✍️ Жалоба: {}",
        dash_if_empty(&draft.branch),
        dash_if_empty(&draft.parent_name),
        dash_if_empty(&draft.student_name),
        dash_if_empty(&draft.phone),
        dash_if_empty(&draft.category),
        dash_if_empty(&draft.description),
    );

    let markup = Some(ReplyMarkup::Inline(confirm_keyboard()));
    match &draft.media {
        Some(media) => {
            state
                .gateway
                .send_media(chat_id, media, &preview, markup)
                .await?;
        }
        None => {
            state.gateway.send_message(chat_id, &preview, markup).await?;
        }
    }
    Ok(())
}

fn group_announcement(id: &str, draft: &crate::intake::Draft, submitter: &Submitter) -> String {
    format!(
        "<b>📋 Новая жалоба</b>\n\
         <b>ID:</b> {id}\n\n\
         🏫 <b>Филиал:</b> {}\n\
         👩‍👦 <b>Родитель:</b> {}\n\
         🧒 <b>Ученик:</b> {}\n\
         ☎️ <b>Телефон:</b> {}\n\
         📂 <b>Категория:</b> {}\n\
         ✍️ <b>Жалоба:</b> {}\n\n\
         👤 <b>Отправитель:</b> {}\n\
         🆔 <code>{}</code>",
        dash_if_empty(&draft.branch),
        dash_if_empty(&draft.parent_name),
        dash_if_empty(&draft.student_name),
        dash_if_empty(&draft.phone),
        dash_if_empty(&draft.category),
        dash_if_empty(&draft.description),
        submitter.display(),
        submitter.user_id,
    )
}

/// Confirm pressed on the preview.
///
/// Order matters: the record row is written first; only then is the
/// intake group told. A store failure aborts with a user-visible error
/// and leaves the draft intact for a retry.
pub async fn confirm_send(
    state: &AppState,
    user_id: i64,
    chat_id: i64,
    submitter: &Submitter,
) -> AppResult<()> {
    let Some(draft) = state.sessions.get(user_id) else {
        return Ok(());
    };
    if draft.sending {
        state
            .gateway
            .send_message(
                chat_id,
                "⚠️ Жалоба уже отправляется, подождите пару секунд.",
                None,
            )
            .await?;
        return Ok(());
    }
    state.sessions.update(user_id, |d| d.sending = true);

    let id = draft
        .id
        .clone()
        .unwrap_or_else(|| format!("A-{}", fallback_id_suffix(state.config.timezone)));
    let created_at = now_display(state.config.timezone);

    let record = NewComplaint {
        id: id.clone(),
        created_at,
        branch: draft.branch.clone(),
        parent_name: draft.parent_name.clone(),
        student_name: draft.student_name.clone(),
        phone: draft.phone.clone(),
        category: draft.category.clone(),
        description: draft.description.clone(),
        status: ComplaintStatus::Submitted.as_str().to_string(),
        sender: submitter.display(),
        sender_user_id: submitter.user_id.to_string(),
    };

    if let Err(e) = state.repo.create(&record).await {
        tracing::error!(id = %id, error = %e, "Storing complaint failed");
        state.sessions.update(user_id, |d| d.sending = false);
        state
            .gateway
            .send_message(chat_id, "⚠️ Ошибка при сохранении в таблицу.", None)
            .await?;
        return Ok(());
    }

    let announcement = group_announcement(&id, &draft, submitter);
    let called_kb = InlineKeyboardMarkup::single(InlineKeyboardButton::new(
        "📞 Перезвонили родителю",
        CallbackPayload::Called(id.clone()).encode(),
    ));
    let group = state.config.group_complaints_id;
    let sent = match &draft.media {
        Some(media) => {
            state
                .gateway
                .send_media(
                    group,
                    media,
                    &announcement,
                    Some(ReplyMarkup::Inline(called_kb)),
                )
                .await
        }
        None => {
            state
                .gateway
                .send_message(group, &announcement, Some(ReplyMarkup::Inline(called_kb)))
                .await
        }
    };

    if let Err(e) = sent {
        // the record exists; the group announcement can be repeated by hand
        tracing::error!(id = %id, error = %e, "Announcing complaint to the intake group failed");
        state.sessions.update(user_id, |d| d.sending = false);
        state
            .gateway
            .send_message(chat_id, "⚠️ Ошибка при отправке в группу.", None)
            .await?;
        return Ok(());
    }

    state.sessions.remove(user_id);
    state
        .gateway
        .send_message(
            chat_id,
            "✅ Жалоба успешно отправлена и сохранена.",
            Some(main_menu()),
        )
        .await?;
    tracing::info!(id = %id, user = user_id, "Complaint submitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::state_with_doubles;

    const USER: i64 = 500;
    const CHAT: i64 = 500;

    fn submitter() -> Submitter {
        Submitter {
            full_name: "Aziz T".into(),
            username: "@aziz".into(),
            user_id: USER,
        }
    }

    async fn fill_form(state: &AppState) {
        start_form(state, USER, CHAT).await.unwrap();
        branch_selected(state, USER, CHAT, "Ганга").await.unwrap();
        text_input(state, USER, CHAT, "Иванова Анна").await.unwrap();
        text_input(state, USER, CHAT, "Иванов Тимур, 5Б").await.unwrap();
        text_input(state, USER, CHAT, "91 123 45 67").await.unwrap();
        category_selected(state, USER, CHAT, "schedule").await.unwrap();
        text_input(state, USER, CHAT, "Занятие отменили без предупреждения")
            .await
            .unwrap();
        text_input(state, USER, CHAT, "пропустить").await.unwrap();
    }

    #[tokio::test]
    async fn happy_path_reaches_preview_with_assigned_id() {
        let (state, gateway, _) = state_with_doubles();
        fill_form(&state).await;

        let draft = state.sessions.get(USER).unwrap();
        assert_eq!(draft.step, FormStep::Preview);
        assert_eq!(draft.id.as_deref(), Some("A-1"));
        assert_eq!(draft.phone, "+998911234567");

        let preview = gateway.sent_to(CHAT).await.pop().unwrap();
        assert!(preview.text.contains("Проверьте данные жалобы"));
        assert!(preview.has_markup);
    }

    #[tokio::test]
    async fn invalid_phone_reprompts_without_advancing() {
        let (state, gateway, _) = state_with_doubles();
        start_form(&state, USER, CHAT).await.unwrap();
        branch_selected(&state, USER, CHAT, "Ракат").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();

        text_input(&state, USER, CHAT, "12345").await.unwrap();
        assert_eq!(state.sessions.step_of(USER), Some(FormStep::Phone));
        let last = gateway.sent_to(CHAT).await.pop().unwrap();
        assert!(last.text.contains("Неправильный номер"));
    }

    #[tokio::test]
    async fn short_description_is_rejected() {
        let (state, _, _) = state_with_doubles();
        start_form(&state, USER, CHAT).await.unwrap();
        branch_selected(&state, USER, CHAT, "Ракат").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();
        text_input(&state, USER, CHAT, "911234567").await.unwrap();
        category_selected(&state, USER, CHAT, "other").await.unwrap();

        text_input(&state, USER, CHAT, "ab").await.unwrap();
        assert_eq!(state.sessions.step_of(USER), Some(FormStep::Description));
    }

    #[tokio::test]
    async fn confirm_writes_the_row_before_announcing() {
        let (state, gateway, store) = state_with_doubles();
        fill_form(&state).await;
        confirm_send(&state, USER, CHAT, &submitter()).await.unwrap();

        let rows = store.rows().await;
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[0], "A-1");
        assert_eq!(row[2], "Ганга");
        assert_eq!(row[8], ComplaintStatus::Submitted.as_str());
        assert_eq!(row[16], USER.to_string());

        let group_msgs = gateway.sent_to(state.config.group_complaints_id).await;
        assert_eq!(group_msgs.len(), 1);
        assert!(group_msgs[0].text.contains("Новая жалоба"));
        assert!(group_msgs[0].has_markup);

        // session is gone, a repeat press is a no-op
        assert!(state.sessions.get(USER).is_none());
        confirm_send(&state, USER, CHAT, &submitter()).await.unwrap();
        assert_eq!(store.rows().await.len(), 2);
    }

    #[tokio::test]
    async fn store_failure_aborts_without_announcing() {
        let (state, gateway, store) = state_with_doubles();
        fill_form(&state).await;
        store
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        confirm_send(&state, USER, CHAT, &submitter()).await.unwrap();

        assert!(gateway.sent_to(state.config.group_complaints_id).await.is_empty());
        let last = gateway.sent_to(CHAT).await.pop().unwrap();
        assert!(last.text.contains("Ошибка при сохранении"));
        // draft survives for a retry
        let draft = state.sessions.get(USER).unwrap();
        assert!(!draft.sending);
    }

    #[tokio::test]
    async fn media_complaint_is_announced_with_the_attachment() {
        let (state, gateway, store) = state_with_doubles();
        start_form(&state, USER, CHAT).await.unwrap();
        branch_selected(&state, USER, CHAT, "Сергели").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();
        text_input(&state, USER, CHAT, "-").await.unwrap();
        text_input(&state, USER, CHAT, "911234567").await.unwrap();
        category_selected(&state, USER, CHAT, "infrastructure").await.unwrap();
        text_input(&state, USER, CHAT, "Сломан проектор в кабинете 12")
            .await
            .unwrap();
        media_prompt(&state, USER, CHAT, MediaKind::Photo).await.unwrap();
        media_received(
            &state,
            USER,
            CHAT,
            MediaRef {
                kind: MediaKind::Photo,
                file_id: "photo-file-id".into(),
                mime: "image/jpeg".into(),
            },
        )
        .await
        .unwrap();

        confirm_send(&state, USER, CHAT, &submitter()).await.unwrap();

        let group_msgs = gateway.sent_to(state.config.group_complaints_id).await;
        let media = group_msgs[0].media.as_ref().unwrap();
        assert_eq!(media.file_id, "photo-file-id");
        assert_eq!(store.rows().await.len(), 2);
    }

    #[tokio::test]
    async fn unsolicited_media_is_refused() {
        let (state, gateway, _) = state_with_doubles();
        fill_form(&state).await;
        // at preview now, no media was requested
        state.sessions.update(USER, |d| d.step = FormStep::Media);
        media_received(
            &state,
            USER,
            CHAT,
            MediaRef {
                kind: MediaKind::Video,
                file_id: "v".into(),
                mime: "video/mp4".into(),
            },
        )
        .await
        .unwrap();
        let last = gateway.sent_to(CHAT).await.pop().unwrap();
        assert!(last.text.contains("нажмите соответствующую кнопку"));
        assert!(state.sessions.get(USER).unwrap().media.is_none());
    }

    #[tokio::test]
    async fn instruction_document_is_uploaded() {
        use crate::core::{AppState, Config};
        use crate::store::ComplaintRepository;
        use crate::testing::{MemStore, MockGateway};
        use std::io::Write;
        use std::sync::Arc;

        let mut file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(b"%PDF-1.4 guide").unwrap();

        let mut config = Config::for_tests();
        config.instruction_file = file.path().to_string_lossy().into_owned();
        let gateway = Arc::new(MockGateway::default());
        let state = AppState::new(
            config,
            gateway.clone(),
            ComplaintRepository::new(Arc::new(MemStore::schema())),
        );

        send_instruction(&state, CHAT).await.unwrap();

        let docs = gateway.documents.lock().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].2, b"%PDF-1.4 guide");
    }

    #[tokio::test]
    async fn missing_instruction_file_reports_inline() {
        let (state, gateway, _) = state_with_doubles();
        // Config::for_tests points at a file that does not exist
        send_instruction(&state, CHAT).await.unwrap();
        let last = gateway.sent_to(CHAT).await.pop().unwrap();
        assert!(last.text.contains("Ошибка при отправке файла"));
    }

    #[tokio::test]
    async fn edit_restarts_from_scratch() {
        let (state, _, _) = state_with_doubles();
        fill_form(&state).await;
        edit_form(&state, USER, CHAT).await.unwrap();
        let draft = state.sessions.get(USER).unwrap();
        assert_eq!(draft.step, FormStep::Branch);
        assert!(draft.description.is_empty());
    }
}
