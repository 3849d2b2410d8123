//! Resolution authoring
//!
//! Two halves: the "add resolution" button in the resolution group arms a
//! per-user prompt, and the next plain-text message from that user in the
//! same group becomes the resolution. Advances
//! `Acknowledged → PendingNotification` and posts the closure request back
//! to the intake group.

use shared::{CallbackPayload, ComplaintStatus, Submitter};
use shared::complaint::columns;

use crate::core::AppState;
use crate::gateway::{InlineKeyboardButton, InlineKeyboardMarkup, Message, ReplyMarkup};
use crate::lifecycle::{answer, report_store_failure};
use crate::utils::time::now_display;
use crate::utils::validation::validate_min_text;
use crate::utils::AppResult;

/// "Add resolution" pressed. Remembers which complaint this user is
/// resolving; a second press simply retargets the prompt.
pub async fn prompt(
    state: &AppState,
    callback_id: &str,
    complaint_id: &str,
    user_id: i64,
    source: &Message,
) -> AppResult<()> {
    state.pending_resolutions.begin(user_id, complaint_id);

    if let Err(e) = state
        .gateway
        .clear_markup(source.chat.id, source.message_id)
        .await
    {
        tracing::debug!(id = %complaint_id, error = %e, "Could not clear resolution button");
    }

    let ask = format!("✍️ Введите текст решения по жалобе ID {complaint_id}:");
    state.gateway.send_message(source.chat.id, &ask, None).await?;
    answer(state, callback_id, None).await;
    Ok(())
}

/// A plain text message in the resolution group. Returns `false` when the
/// sender has no armed prompt (the message is not for us).
pub async fn submit(
    state: &AppState,
    user_id: i64,
    author: &Submitter,
    chat_id: i64,
    text: &str,
) -> AppResult<bool> {
    let Some(complaint_id) = state.pending_resolutions.get(user_id) else {
        return Ok(false);
    };
    // resolutions are accepted only inside the resolution group
    if chat_id != state.config.group_solutions_id {
        return Ok(false);
    }

    let resolution = match validate_min_text(text, "решение") {
        Ok(resolution) => resolution,
        Err(_) => {
            state
                .gateway
                .send_message(chat_id, "❌ Решение слишком короткое.", None)
                .await?;
            return Ok(true);
        }
    };

    let found = match state.repo.find_by_id(&complaint_id).await {
        Ok(found) => found,
        Err(e) => {
            report_store_failure(state, "решение", &complaint_id, chat_id, &e).await;
            return Ok(true);
        }
    };
    let Some((_, complaint)) = found else {
        state.pending_resolutions.clear(user_id);
        let text = format!("⚠️ Жалоба {complaint_id} не найдена.");
        state.gateway.send_message(chat_id, &text, None).await?;
        return Ok(true);
    };
    if complaint.status != Some(ComplaintStatus::Acknowledged) {
        state.pending_resolutions.clear(user_id);
        let text = format!("⚠️ Жалоба {complaint_id} уже обработана.");
        state.gateway.send_message(chat_id, &text, None).await?;
        return Ok(true);
    }

    let now = now_display(state.config.timezone);
    let responsible = author.display();
    if let Err(e) = state
        .repo
        .update_by_id(
            &complaint_id,
            &[
                (columns::RESOLUTION, resolution.clone()),
                (columns::RESPONSIBLE_PERSON, responsible.clone()),
                (columns::RESOLUTION_TIME, now.clone()),
                (
                    columns::STATUS,
                    ComplaintStatus::PendingNotification.as_str().into(),
                ),
            ],
        )
        .await
    {
        // prompt stays armed, the author can resend the text
        report_store_failure(state, "решение", &complaint_id, chat_id, &e).await;
        return Ok(true);
    }

    let call_at = if complaint.call_at.is_empty() {
        "—".to_string()
    } else {
        complaint.call_at.clone()
    };
    let full = format!(
        "📤 <b>Жалоба ID {complaint_id}</b> передана в <b>«РЕШЕНИЯ»</b>\n\n\
         🏫 <b>Филиал:</b> {}\n\
         👩‍👦 <b>Родитель:</b> {}\n\
         🧒 <b>Ученик:</b> {}\n\
         ☎️ <b>Телефон:</b> {}\n\
         📂 <b>Категория:</b> {}\n\
         ✍️ <b>Жалоба:</b> {}\n\n\
         ☎️ <b>Перезвонили:</b> {call_at}\n\
         💬 <b>Решение:</b> {resolution}\n\
         👤 <b>Ответственный:</b> {responsible}\n\
         🕒 <b>Время решения:</b> {now}",
        complaint.branch,
        complaint.parent_name,
        complaint.student_name,
        complaint.phone,
        complaint.category,
        complaint.description,
    );
    if let Err(e) = state
        .gateway
        .send_message(state.config.group_solutions_id, &full, None)
        .await
    {
        tracing::error!(id = %complaint_id, stage = "решение", error = %e, "Posting the full resolution failed");
    }

    let closure_request = format!(
        "<b>🟩РЕШЕНИЕ ПО ЖАЛОБЕ ГОТОВО🟩</b>\n\n\
         📘 <b>ID жалобы:</b> {complaint_id}\n\n\
         💬 <b>Решение:</b> {resolution}\n\
         👤 <b>Ответственный:</b> {responsible}\n\
         ⏱ <b>Время решения:</b> {now}\n\n\
         ☎️ <b>Требуется уведомить родителя о принятом решении.</b>"
    );
    let notify_kb = ReplyMarkup::Inline(InlineKeyboardMarkup::single(InlineKeyboardButton::new(
        "📨 Сообщили родителю!",
        CallbackPayload::NotifyParent(complaint_id.clone()).encode(),
    )));
    if let Err(e) = state
        .gateway
        .send_message(state.config.group_complaints_id, &closure_request, Some(notify_kb))
        .await
    {
        tracing::error!(id = %complaint_id, stage = "решение", error = %e, "Posting the closure request failed");
    }

    state.pending_resolutions.clear(user_id);
    tracing::info!(id = %complaint_id, by = %responsible, "Resolution recorded");
    Ok(true)
}
