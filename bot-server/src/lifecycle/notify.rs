//! "Parent was notified" transition
//!
//! Final button, pressed in the intake group on the closure request.
//! Advances `PendingNotification → Closed`, stamps who notified and when,
//! and rewrites the closure request in place. No separate press guard: the
//! stored-status check makes a duplicate press a no-op.

use shared::{ComplaintStatus, Submitter};
use shared::complaint::columns;

use crate::core::AppState;
use crate::gateway::Message;
use crate::lifecycle::{answer, report_store_failure};
use crate::utils::time::now_display;
use crate::utils::AppResult;

pub async fn handle(
    state: &AppState,
    callback_id: &str,
    complaint_id: &str,
    actor: &Submitter,
    source: &Message,
) -> AppResult<()> {
    let found = match state.repo.find_by_id(complaint_id).await {
        Ok(found) => found,
        Err(e) => {
            report_store_failure(state, "уведомление", complaint_id, source.chat.id, &e).await;
            return Ok(());
        }
    };
    let Some((_, complaint)) = found else {
        let text = format!("⚠️ Жалоба {complaint_id} не найдена.");
        state.gateway.send_message(source.chat.id, &text, None).await?;
        return Ok(());
    };
    if complaint.status != Some(ComplaintStatus::PendingNotification) {
        answer(state, callback_id, Some("Уже обработано.")).await;
        return Ok(());
    }

    let now = now_display(state.config.timezone);
    let notified_by = actor.display();
    if let Err(e) = state
        .repo
        .update_by_id(
            complaint_id,
            &[
                (columns::STATUS, ComplaintStatus::Closed.as_str().into()),
                (columns::NOTIFICATION_TIME, now.clone()),
                (columns::NOTIFIED_BY, notified_by.clone()),
            ],
        )
        .await
    {
        report_store_failure(state, "уведомление", complaint_id, source.chat.id, &e).await;
        return Ok(());
    }

    let closed = format!(
        "{}\n\n✅ <b>Родитель уведомлен:</b> {now}\n\
         👤 <b>Кто уведомил:</b> {notified_by}\n\
         💚 Жалоба закрыта",
        source.body()
    );
    if let Err(e) = state
        .gateway
        .edit_text(source.chat.id, source.message_id, &closed, None)
        .await
    {
        tracing::warn!(id = %complaint_id, error = %e, "Could not rewrite the closure request");
    }

    answer(state, callback_id, Some("Готово!")).await;
    tracing::info!(id = %complaint_id, by = %notified_by, "Complaint closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::state_with_doubles;
    use crate::gateway::Chat;
    use crate::testing::seed_complaint;

    fn actor() -> Submitter {
        Submitter {
            full_name: "Malika R".into(),
            username: String::new(),
            user_id: 44,
        }
    }

    fn closure_message(state: &crate::core::AppState) -> Message {
        Message {
            message_id: 55,
            chat: Chat {
                id: state.config.group_complaints_id,
                kind: "supergroup".into(),
            },
            text: Some("<b>🟩РЕШЕНИЕ ПО ЖАЛОБЕ ГОТОВО🟩</b>".into()),
            ..Message::default()
        }
    }

    #[tokio::test]
    async fn closes_the_complaint_and_rewrites_the_request() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::PendingNotification).await;

        handle(&state, "cb1", "A-1", &actor(), &closure_message(&state))
            .await
            .unwrap();

        let (_, complaint) = state.repo.find_by_id("A-1").await.unwrap().unwrap();
        assert_eq!(complaint.status, Some(ComplaintStatus::Closed));
        assert_eq!(complaint.notified_by, "Malika R");
        assert!(!complaint.notified_at.is_empty());

        let edits = gateway.edits.lock().await;
        assert!(edits[0].text.contains("Жалоба закрыта"));
        assert!(!edits[0].has_markup);
    }

    #[tokio::test]
    async fn duplicate_press_is_a_noop() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::PendingNotification).await;
        let msg = closure_message(&state);

        handle(&state, "cb1", "A-1", &actor(), &msg).await.unwrap();
        let first_notified_at = state
            .repo
            .find_by_id("A-1")
            .await
            .unwrap()
            .unwrap()
            .1
            .notified_at;

        handle(&state, "cb2", "A-1", &actor(), &msg).await.unwrap();

        let (_, complaint) = state.repo.find_by_id("A-1").await.unwrap().unwrap();
        assert_eq!(complaint.notified_at, first_notified_at);
        assert_eq!(gateway.edits.lock().await.len(), 1);
        let callbacks = gateway.callbacks.lock().await;
        assert!(callbacks
            .iter()
            .any(|(id, text)| id == "cb2" && text.as_deref() == Some("Уже обработано.")));
    }

    #[tokio::test]
    async fn press_before_resolution_is_refused() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::Acknowledged).await;

        handle(&state, "cb1", "A-1", &actor(), &closure_message(&state))
            .await
            .unwrap();

        let (_, complaint) = state.repo.find_by_id("A-1").await.unwrap().unwrap();
        assert_eq!(complaint.status, Some(ComplaintStatus::Acknowledged));
        assert!(gateway.edits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_reports_to_leadership() {
        let (state, gateway, store) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::PendingNotification).await;
        store
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        handle(&state, "cb1", "A-1", &actor(), &closure_message(&state))
            .await
            .unwrap();

        let leaders = gateway.sent_to(state.config.group_leaders_id).await;
        assert!(leaders[0].text.contains("Сбой записи"));
        assert!(gateway.edits.lock().await.is_empty());
    }
}
