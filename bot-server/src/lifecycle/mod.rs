//! Complaint lifecycle — status transitions
//!
//! The three interactive transitions, each driven by an inline button:
//!
//! - `called`: intake staff confirm the parent was called
//!   (`Submitted → Acknowledged`, complaint relayed to the resolution group)
//! - `solution`: resolution group authors a resolution text
//!   (`Acknowledged → PendingNotification`, closure request posted back)
//! - `notify`: intake staff confirm the parent was informed
//!   (`PendingNotification → Closed`)
//!
//! Every transition writes the record store first; chat messages follow and
//! their failures are logged but never roll back the stored status. Each
//! action verifies the stored status is the expected predecessor, so a
//! duplicate or stale press can never move a complaint backward.

pub mod called;
pub mod guards;
pub mod notify;
pub mod solution;

pub use guards::{GuardStore, PendingResolutions};

use crate::core::AppState;

/// Best-effort callback acknowledgement.
pub(crate) async fn answer(state: &AppState, callback_id: &str, text: Option<&str>) {
    if let Err(e) = state.gateway.answer_callback(callback_id, text).await {
        tracing::debug!(error = %e, "answerCallbackQuery failed");
    }
}

/// A lifecycle store write failed: tell the acting chat and leave a short
/// diagnostic in the leadership group.
pub(crate) async fn report_store_failure(
    state: &AppState,
    stage: &str,
    complaint_id: &str,
    chat_id: i64,
    error: &crate::utils::AppError,
) {
    tracing::error!(id = %complaint_id, stage, error = %error, "Lifecycle store write failed");
    if let Err(e) = state
        .gateway
        .send_message(chat_id, "⚠️ Ошибка при сохранении в таблицу.", None)
        .await
    {
        tracing::warn!(id = %complaint_id, error = %e, "Could not report store failure inline");
    }
    let note = format!("⚠️ Сбой записи в таблицу: жалоба {complaint_id}, шаг «{stage}».");
    if let Err(e) = state
        .gateway
        .send_message(state.config.group_leaders_id, &note, None)
        .await
    {
        tracing::warn!(id = %complaint_id, error = %e, "Could not relay store failure to leadership");
    }
}
