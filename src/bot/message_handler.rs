//! Message Handler module for processing moderation text commands

use tracing::{debug, info};

use crate::errors::HandlerError;
use crate::moderation::{parse_command, Hwid};
use crate::update::TextMessage;

use super::ui_builder::{format_command_confirmation, format_missing_hwid};
use super::ModerationBot;

/// Handle `/approve`, `/reject` or `/hold`
///
/// Messages from chats other than the admin chat are dropped without a reply.
/// When the command carries no HWID, the first HWID in the replied-to message
/// is used.
pub async fn message_handler(bot: &ModerationBot, msg: TextMessage) -> Result<(), HandlerError> {
    if !bot.is_admin(Some(msg.chat_id)) {
        debug!(chat_id = %msg.chat_id.0, "Ignoring message from unauthorized chat");
        return Ok(());
    }

    let Some(command) = parse_command(&msg.text) else {
        debug!(chat_id = %msg.chat_id.0, "Message is not a moderation command");
        return Ok(());
    };

    let hwid = command
        .hwid
        .or_else(|| msg.reply_to_text.as_deref().and_then(Hwid::find_in));

    let Some(hwid) = hwid else {
        let sent = bot
            .messenger()
            .send_message(msg.chat_id, &format_missing_hwid(command.action))
            .await;
        bot.notify(sent);
        return Ok(());
    };

    let status = command.action.status();
    bot.apply_status(&hwid, status).await?;
    info!(chat_id = %msg.chat_id.0, hwid = %hwid, status = %status, "Command moderation applied");

    let sent = bot
        .messenger()
        .send_message(msg.chat_id, &format_command_confirmation(status, &hwid))
        .await;
    bot.notify(sent);

    Ok(())
}
