//! "Parent was called" transition
//!
//! First button on a fresh complaint, pressed in the intake group.
//! Advances `Submitted → Acknowledged`, stamps the call time, strips the
//! button from the announcement and relays the complaint to the resolution
//! group with an "add resolution" button.

use shared::{CallbackPayload, ComplaintStatus};
use shared::complaint::columns;

use crate::core::AppState;
use crate::gateway::{InlineKeyboardButton, InlineKeyboardMarkup, Message, ReplyMarkup};
use crate::lifecycle::{answer, report_store_failure};
use crate::utils::time::now_display;
use crate::utils::AppResult;

pub async fn handle(
    state: &AppState,
    callback_id: &str,
    complaint_id: &str,
    source: &Message,
) -> AppResult<()> {
    // first press wins; the stored-status check below covers restarts
    // (the callback is answered once, at the outcome)
    if !state.guards.arm_called(complaint_id) {
        answer(state, callback_id, Some("Уже обработано.")).await;
        return Ok(());
    }

    let found = match state.repo.find_by_id(complaint_id).await {
        Ok(found) => found,
        Err(e) => {
            state.guards.disarm_called(complaint_id);
            report_store_failure(state, "перезвон", complaint_id, source.chat.id, &e).await;
            return Ok(());
        }
    };
    let Some((_, complaint)) = found else {
        state.guards.disarm_called(complaint_id);
        let text = format!("⚠️ Жалоба {complaint_id} не найдена.");
        state.gateway.send_message(source.chat.id, &text, None).await?;
        return Ok(());
    };
    if complaint.status != Some(ComplaintStatus::Submitted) {
        answer(state, callback_id, Some("Уже обработано.")).await;
        return Ok(());
    }

    let now = now_display(state.config.timezone);
    if let Err(e) = state
        .repo
        .update_by_id(
            complaint_id,
            &[
                (columns::STATUS, ComplaintStatus::Acknowledged.as_str().into()),
                (columns::CALL_TIME, now.clone()),
            ],
        )
        .await
    {
        state.guards.disarm_called(complaint_id);
        report_store_failure(state, "перезвон", complaint_id, source.chat.id, &e).await;
        return Ok(());
    }

    // from here on the transition is committed; chat updates are best effort
    let updated = format!("{}\n☎️ <b>Перезвонили:</b> {now}", source.body());
    let edit = if source.has_media() {
        state
            .gateway
            .edit_caption(source.chat.id, source.message_id, &updated, None)
            .await
    } else {
        state
            .gateway
            .edit_text(source.chat.id, source.message_id, &updated, None)
            .await
    };
    if let Err(e) = edit {
        tracing::warn!(id = %complaint_id, error = %e, "Could not edit intake announcement");
    }

    let relay = format!("📤 Жалоба ID {complaint_id} передана в «РЕШЕНИЯ».\n\n{updated}");
    let solution_kb = ReplyMarkup::Inline(InlineKeyboardMarkup::single(InlineKeyboardButton::new(
        "💬 Добавить решение",
        CallbackPayload::Solution(complaint_id.to_string()).encode(),
    )));
    let sent = match source.media_ref() {
        Some(media) => {
            state
                .gateway
                .send_media(
                    state.config.group_solutions_id,
                    &media,
                    &relay,
                    Some(solution_kb),
                )
                .await
        }
        None => {
            state
                .gateway
                .send_message(state.config.group_solutions_id, &relay, Some(solution_kb))
                .await
        }
    };
    if let Err(e) = sent {
        tracing::error!(id = %complaint_id, stage = "перезвон", error = %e, "Relay to resolution group failed");
    }

    answer(state, callback_id, Some("✅ Жалоба передана в «РЕШЕНИЯ».")).await;
    tracing::info!(id = %complaint_id, "Complaint acknowledged");
    Ok(())
}
