//! Update router
//!
//! Maps every inbound update onto a handler: private-chat messages feed the
//! intake form and the menu, resolution-group text feeds a pending
//! resolution prompt, and callback payloads fan out to the intake,
//! lifecycle and statistics handlers. Anything unrecognized is logged at
//! debug and dropped.

use std::sync::Arc;

use shared::{CallbackPayload, MediaKind, Submitter};

use crate::core::AppState;
use crate::gateway::{CallbackQuery, Message, Update, User};
use crate::intake::flow;
use crate::intake::{MENU_INSTRUCTION, MENU_NEW_COMPLAINT, MENU_STATISTICS};
use crate::lifecycle::{answer, called, notify, solution};
use crate::stats::view;
use crate::utils::AppResult;

fn submitter(user: &User) -> Submitter {
    Submitter {
        full_name: user.full_name(),
        username: user.handle(),
        user_id: user.id,
    }
}

/// Route one update. Handler errors bubble up to the polling loop, which
/// logs them and moves on to the next update.
pub async fn handle_update(state: &Arc<AppState>, update: Update) -> AppResult<()> {
    if let Some(message) = update.message {
        return handle_message(state, message).await;
    }
    if let Some(callback) = update.callback_query {
        return handle_callback(state, callback).await;
    }
    Ok(())
}

async fn handle_message(state: &Arc<AppState>, message: Message) -> AppResult<()> {
    let Some(user) = message.from.clone() else {
        return Ok(());
    };

    if message.chat.is_private() {
        if let Some(media) = message.media_ref() {
            flow::media_received(state, user.id, message.chat.id, media).await?;
            return Ok(());
        }
        let text = message.body().trim().to_string();
        match text.as_str() {
            "/start" => flow::cmd_start(state, message.chat.id).await?,
            MENU_NEW_COMPLAINT => flow::start_form(state, user.id, message.chat.id).await?,
            MENU_INSTRUCTION => flow::send_instruction(state, message.chat.id).await?,
            MENU_STATISTICS => view::show_overview(state, &message.chat, user.id).await?,
            _ => {
                if !flow::text_input(state, user.id, message.chat.id, &text).await? {
                    tracing::debug!(user = user.id, "Private message outside any flow ignored");
                }
            }
        }
        return Ok(());
    }

    // the only group traffic the bot consumes is a pending resolution text
    if message.chat.id == state.config.group_solutions_id {
        if let Some(text) = message.text.as_deref() {
            solution::submit(state, user.id, &submitter(&user), message.chat.id, text).await?;
        }
    }
    Ok(())
}

async fn handle_callback(state: &Arc<AppState>, callback: CallbackQuery) -> AppResult<()> {
    let Some(data) = callback.data.as_deref() else {
        return Ok(());
    };
    let Some(payload) = CallbackPayload::parse(data) else {
        tracing::debug!(data, "Unknown callback payload ignored");
        answer(state, &callback.id, None).await;
        return Ok(());
    };
    // buttons detached from their message cannot be handled
    let Some(message) = callback.message.clone() else {
        answer(state, &callback.id, None).await;
        return Ok(());
    };
    let chat_id = message.chat.id;
    let user = callback.from.clone();

    match payload {
        CallbackPayload::Branch(branch) => {
            flow::branch_selected(state, user.id, chat_id, &branch).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::Category(code) => {
            flow::category_selected(state, user.id, chat_id, &code).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::AddPhoto => {
            flow::media_prompt(state, user.id, chat_id, MediaKind::Photo).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::AddVideo => {
            flow::media_prompt(state, user.id, chat_id, MediaKind::Video).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::SkipMedia => {
            flow::skip_media(state.clone(), user.id, chat_id).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::ConfirmSend => {
            flow::confirm_send(state, user.id, chat_id, &submitter(&user)).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::EditForm => {
            flow::edit_form(state, user.id, chat_id).await?;
            answer(state, &callback.id, None).await;
        }
        CallbackPayload::Called(id) => {
            called::handle(state, &callback.id, &id, &message).await?;
        }
        CallbackPayload::Solution(id) => {
            solution::prompt(state, &callback.id, &id, user.id, &message).await?;
        }
        CallbackPayload::NotifyParent(id) => {
            notify::handle(state, &callback.id, &id, &submitter(&user), &message).await?;
        }
        CallbackPayload::StatsByBranch => {
            view::by_branch(state, &callback.id, user.id, chat_id).await?;
        }
        CallbackPayload::StatsByCategory => {
            view::by_category(state, &callback.id, user.id, chat_id).await?;
        }
        CallbackPayload::StatsByDate => {
            view::by_date(state, &callback.id, user.id, chat_id).await?;
        }
        CallbackPayload::StatsDownload => {
            view::download(state, &callback.id, user.id, chat_id).await?;
        }
    }
    Ok(())
}
