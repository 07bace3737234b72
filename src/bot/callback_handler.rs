//! Callback Handler module for processing moderation button presses

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::HandlerError;
use crate::moderation::parse_callback_data;
use crate::update::ButtonPress;

use super::ui_builder::{
    format_callback_confirmation, format_status_update, INVALID_ACTION, NOT_AUTHORIZED,
};
use super::ModerationBot;

/// Handle a press on an `action:hwid` inline button
///
/// A store failure is returned before the callback is answered, leaving the
/// button spinner visible to the admin.
pub async fn callback_handler(bot: &ModerationBot, press: ButtonPress) -> Result<(), HandlerError> {
    debug!(callback_id = %press.callback_id, chat_id = ?press.chat_id, "Received callback query");

    if !bot.is_admin(press.chat_id) {
        warn!(chat_id = ?press.chat_id, "Callback from unauthorized chat");
        let answered = bot
            .messenger()
            .answer_callback_query(&press.callback_id, Some(NOT_AUTHORIZED))
            .await;
        bot.notify(answered);
        return Ok(());
    }

    let Some((action, hwid)) = parse_callback_data(&press.data) else {
        warn!(data = %press.data, "Invalid callback payload");
        let answered = bot
            .messenger()
            .answer_callback_query(&press.callback_id, Some(INVALID_ACTION))
            .await;
        bot.notify(answered);
        return Ok(());
    };

    let status = action.status();
    bot.apply_status(&hwid, status).await?;
    info!(hwid = %hwid, status = %status, "Callback moderation applied");

    let confirmation = format_callback_confirmation(status);
    let answered = bot
        .messenger()
        .answer_callback_query(&press.callback_id, Some(confirmation.as_str()))
        .await;
    bot.notify(answered);

    // Inline-mode messages come without a chat message to edit
    if let (Some(chat_id), Some(message_id)) = (press.chat_id, press.message_id) {
        let text = format_status_update(status, &hwid, Utc::now());
        let edited = bot
            .messenger()
            .edit_message_text(chat_id, message_id, &text)
            .await;
        bot.notify(edited);
    } else {
        debug!(callback_id = %press.callback_id, "No message attached to callback, skipping edit");
    }

    Ok(())
}
