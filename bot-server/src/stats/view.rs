//! Admin statistics menu
//!
//! Private-chat surface for administrators of the resolution group. One
//! overview message with an inline menu; the breakdowns answer as separate
//! messages, the export comes back as a CSV document.

use chrono::Duration;
use shared::{CallbackPayload, Category, Complaint};

use crate::core::AppState;
use crate::gateway::{Chat, InlineKeyboardButton, InlineKeyboardMarkup, ReplyMarkup};
use crate::stats::{summary_footer, StatusCounts};
use crate::utils::time::{now_local, parse_stored_date};
use crate::utils::AppResult;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━";

/// Membership in the resolution group's administrator list. Lookup
/// failures are logged and treated as "not an admin".
pub async fn is_admin(state: &AppState, user_id: i64) -> bool {
    match state
        .gateway
        .chat_administrators(state.config.group_solutions_id)
        .await
    {
        Ok(admins) => admins.contains(&user_id),
        Err(e) => {
            tracing::warn!(error = %e, "Admin lookup failed");
            false
        }
    }
}

fn counts_block(counts: &StatusCounts) -> String {
    format!(
        "📋 Всего жалоб: {}\n\
         📞 Ожидают перезвона: {}\n\
         💬 Ожидают решения: {}\n\
         🪪 Ожидают уведомления: {}\n\
         ✅ Закрыто: {}\n\
         📈 Прогресс закрытия: {}",
        counts.total,
        counts.submitted,
        counts.acknowledged,
        counts.pending_notification,
        counts.closed,
        counts.progress()
    )
}

async fn load_all(state: &AppState, chat_id: i64) -> AppResult<Option<Vec<Complaint>>> {
    match state.repo.scan_all().await {
        Ok(complaints) => Ok(Some(complaints)),
        Err(e) => {
            tracing::error!(error = %e, "Statistics data fetch failed");
            state
                .gateway
                .send_message(chat_id, "⚠️ Ошибка при загрузке данных.", None)
                .await?;
            Ok(None)
        }
    }
}

/// The statistics menu entry pressed in a chat.
pub async fn show_overview(state: &AppState, chat: &Chat, user_id: i64) -> AppResult<()> {
    if !chat.is_private() {
        state
            .gateway
            .send_message(
                chat.id,
                "📊 Статистику можно запросить только через личные сообщения с ботом.",
                None,
            )
            .await?;
        return Ok(());
    }
    if !is_admin(state, user_id).await {
        state
            .gateway
            .send_message(chat.id, "⛔ У вас нет прав для просмотра статистики.", None)
            .await?;
        return Ok(());
    }

    let Some(complaints) = load_all(state, chat.id).await? else {
        return Ok(());
    };
    if complaints.is_empty() {
        state
            .gateway
            .send_message(chat.id, "⚠️ Данных пока нет.", None)
            .await?;
        return Ok(());
    }

    let counts = StatusCounts::tally(&complaints);
    let mut text = format!("<b>📊 ОБЩАЯ СТАТИСТИКА</b>\n{DIVIDER}\n{}", counts_block(&counts));
    text.push_str(&summary_footer(&complaints));

    let menu = InlineKeyboardMarkup::rows(vec![
        vec![InlineKeyboardButton::new(
            "🏫 По филиалам",
            CallbackPayload::StatsByBranch.encode(),
        )],
        vec![InlineKeyboardButton::new(
            "📂 По категориям",
            CallbackPayload::StatsByCategory.encode(),
        )],
        vec![InlineKeyboardButton::new(
            "📅 По датам",
            CallbackPayload::StatsByDate.encode(),
        )],
        vec![InlineKeyboardButton::new(
            "📥 Скачать CSV",
            CallbackPayload::StatsDownload.encode(),
        )],
    ]);
    state
        .gateway
        .send_message(chat.id, &text, Some(ReplyMarkup::Inline(menu)))
        .await?;
    Ok(())
}

/// Admin gate shared by the menu callbacks. Answers the callback with a
/// refusal when the user is not an admin.
async fn gate(state: &AppState, callback_id: &str, user_id: i64) -> bool {
    if is_admin(state, user_id).await {
        true
    } else {
        crate::lifecycle::answer(state, callback_id, Some("⛔ Нет доступа.")).await;
        false
    }
}

pub async fn by_branch(
    state: &AppState,
    callback_id: &str,
    user_id: i64,
    chat_id: i64,
) -> AppResult<()> {
    if !gate(state, callback_id, user_id).await {
        return Ok(());
    }
    let Some(complaints) = load_all(state, chat_id).await? else {
        return Ok(());
    };
    if complaints.is_empty() {
        state.gateway.send_message(chat_id, "⚠️ Данных нет.", None).await?;
        return Ok(());
    }

    let mut branches: Vec<String> = Vec::new();
    for c in &complaints {
        if !c.branch.is_empty() && !branches.contains(&c.branch) {
            branches.push(c.branch.clone());
        }
    }

    let mut text = format!("<b>🏫 СТАТИСТИКА ПО ФИЛИАЛАМ</b>\n{DIVIDER}");
    for branch in branches {
        let subset: Vec<&Complaint> = complaints.iter().filter(|c| c.branch == branch).collect();
        let counts = StatusCounts::tally(subset.into_iter());
        text.push_str(&format!("\n\n🏫 <b>{branch}</b>\n{}", counts_block(&counts)));
    }
    text.push_str(&summary_footer(&complaints));

    state.gateway.send_message(chat_id, &text, None).await?;
    crate::lifecycle::answer(state, callback_id, None).await;
    Ok(())
}

pub async fn by_category(
    state: &AppState,
    callback_id: &str,
    user_id: i64,
    chat_id: i64,
) -> AppResult<()> {
    if !gate(state, callback_id, user_id).await {
        return Ok(());
    }
    let Some(complaints) = load_all(state, chat_id).await? else {
        return Ok(());
    };
    if complaints.is_empty() {
        state
            .gateway
            .send_message(chat_id, "⚠️ Нет данных по категориям.", None)
            .await?;
        return Ok(());
    }

    let mut text = format!("<b>📂 СТАТИСТИКА ПО КАТЕГОРИЯМ</b>\n{DIVIDER}");
    let mut any = false;
    for category in Category::ALL {
        let subset: Vec<&Complaint> = complaints
            .iter()
            .filter(|c| c.category == category.title())
            .collect();
        if subset.is_empty() {
            continue;
        }
        any = true;
        let counts = StatusCounts::tally(subset.into_iter());
        text.push_str(&format!(
            "\n\n📂 <b>{}</b>\n{}",
            category.title(),
            counts_block(&counts)
        ));
    }
    if !any {
        state
            .gateway
            .send_message(chat_id, "⚠️ Нет данных по категориям.", None)
            .await?;
        return Ok(());
    }
    text.push_str(&summary_footer(&complaints));

    state.gateway.send_message(chat_id, &text, None).await?;
    crate::lifecycle::answer(state, callback_id, None).await;
    Ok(())
}

pub async fn by_date(
    state: &AppState,
    callback_id: &str,
    user_id: i64,
    chat_id: i64,
) -> AppResult<()> {
    if !gate(state, callback_id, user_id).await {
        return Ok(());
    }
    let Some(complaints) = load_all(state, chat_id).await? else {
        return Ok(());
    };

    let cutoff = now_local(state.config.timezone).naive_local() - Duration::days(7);
    let recent: Vec<Complaint> = complaints
        .into_iter()
        .filter(|c| {
            parse_stored_date(&c.created_at)
                .map(|d| d >= cutoff)
                .unwrap_or(false)
        })
        .collect();
    if recent.is_empty() {
        state
            .gateway
            .send_message(chat_id, "⚠️ Нет данных по датам.", None)
            .await?;
        return Ok(());
    }

    let counts = StatusCounts::tally(&recent);
    let mut text = format!(
        "<b>📅 СТАТИСТИКА ЗА 7 ДНЕЙ</b>\n{DIVIDER}\n{}",
        counts_block(&counts)
    );
    text.push_str(&summary_footer(&recent));

    state.gateway.send_message(chat_id, &text, None).await?;
    crate::lifecycle::answer(state, callback_id, None).await;
    Ok(())
}

pub async fn download(
    state: &AppState,
    callback_id: &str,
    user_id: i64,
    chat_id: i64,
) -> AppResult<()> {
    if !gate(state, callback_id, user_id).await {
        return Ok(());
    }
    let rows = match state.repo.all_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Export data fetch failed");
            state
                .gateway
                .send_message(chat_id, "⚠️ Ошибка при загрузке данных.", None)
                .await?;
            return Ok(());
        }
    };
    if rows.len() <= 1 {
        state
            .gateway
            .send_message(chat_id, "⚠️ Нет данных для выгрузки.", None)
            .await?;
        return Ok(());
    }

    state
        .gateway
        .send_document_bytes(
            chat_id,
            "statistics.csv",
            crate::stats::export::csv_bytes(&rows),
            "📊 Полный отчёт по жалобам.",
        )
        .await?;
    crate::lifecycle::answer(state, callback_id, None).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::state_with_doubles;
    use crate::testing::seed_complaint;
    use shared::ComplaintStatus;

    const ADMIN: i64 = 1450296021;
    const STRANGER: i64 = 111;

    fn private_chat(id: i64) -> Chat {
        Chat {
            id,
            kind: "private".into(),
        }
    }

    #[tokio::test]
    async fn overview_requires_private_chat() {
        let (state, gateway, _) = state_with_doubles();
        let group = Chat {
            id: -500,
            kind: "supergroup".into(),
        };
        show_overview(&state, &group, ADMIN).await.unwrap();
        let sent = gateway.sent_to(-500).await;
        assert!(sent[0].text.contains("только через личные сообщения"));
    }

    #[tokio::test]
    async fn overview_requires_admin() {
        let (state, gateway, _) = state_with_doubles();
        show_overview(&state, &private_chat(STRANGER), STRANGER)
            .await
            .unwrap();
        let sent = gateway.sent_to(STRANGER).await;
        assert!(sent[0].text.contains("нет прав"));
    }

    #[tokio::test]
    async fn overview_tallies_statuses() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::Submitted).await;
        seed_complaint(&state.repo, "A-2", ComplaintStatus::Closed).await;
        seed_complaint(&state.repo, "A-3", ComplaintStatus::Closed).await;

        show_overview(&state, &private_chat(ADMIN), ADMIN).await.unwrap();

        let sent = gateway.sent_to(ADMIN).await;
        let text = &sent[0].text;
        assert!(text.contains("ОБЩАЯ СТАТИСТИКА"));
        assert!(text.contains("Всего жалоб: 3"));
        assert!(text.contains("Закрыто: 2"));
        assert!(text.contains("Прогресс закрытия: 67%"));
        assert!(sent[0].has_markup);
    }

    #[tokio::test]
    async fn branch_breakdown_has_one_block_per_branch() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::Submitted).await;

        by_branch(&state, "cb", ADMIN, ADMIN).await.unwrap();
        let sent = gateway.sent_to(ADMIN).await;
        assert!(sent[0].text.contains("🏫 <b>Ганга</b>"));
    }

    #[tokio::test]
    async fn non_admin_callbacks_are_refused() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::Submitted).await;

        download(&state, "cb", STRANGER, STRANGER).await.unwrap();

        assert!(gateway.documents.lock().await.is_empty());
        let callbacks = gateway.callbacks.lock().await;
        assert_eq!(callbacks[0].1.as_deref(), Some("⛔ Нет доступа."));
    }

    #[tokio::test]
    async fn download_sends_the_full_table() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint(&state.repo, "A-1", ComplaintStatus::Submitted).await;

        download(&state, "cb", ADMIN, ADMIN).await.unwrap();

        let docs = gateway.documents.lock().await;
        assert_eq!(docs[0].1, "statistics.csv");
        let csv = String::from_utf8(docs[0].2.clone()).unwrap();
        assert!(csv.contains("A-1"));
        assert!(csv.contains("ID,Date,Branch"));
    }

    #[tokio::test]
    async fn empty_table_download_reports_no_data() {
        let (state, gateway, _) = state_with_doubles();
        download(&state, "cb", ADMIN, ADMIN).await.unwrap();
        let sent = gateway.sent_to(ADMIN).await;
        assert!(sent[0].text.contains("Нет данных для выгрузки"));
    }
}
