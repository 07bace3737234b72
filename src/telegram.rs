//! # Telegram Bot API Client
//!
//! The three Bot API methods the moderation flow needs, sent through a
//! teloxide [`Bot`].

use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, MessageId};
use teloxide::RequestError;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::errors::{ConfigError, MessagingError};

/// Outbound messaging operations used by the handlers
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message to a chat
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), MessagingError>;

    /// Replace the text of an existing message
    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), MessagingError>;

    /// Answer a pending callback query, optionally showing a short notice
    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), MessagingError>;
}

/// Build the teloxide [`Bot`] for the configured API endpoint
///
/// Every call made through the bot is bounded by `timeout`.
pub fn telegram_bot(config: &TelegramConfig, timeout: Duration) -> Result<Bot, ConfigError> {
    let api_url = reqwest::Url::parse(&config.api_url).map_err(|_| ConfigError::Invalid {
        var: "TELEGRAM_API_URL",
        value: config.api_url.clone(),
    })?;
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Bot::with_client(config.bot_token.clone(), client).set_api_url(api_url))
}

fn messaging_error(method: &'static str, err: RequestError) -> MessagingError {
    match err {
        RequestError::Api(api) => MessagingError::Api {
            method,
            description: api.to_string(),
        },
        source => MessagingError::Request { method, source },
    }
}

#[async_trait]
impl Messenger for Bot {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), MessagingError> {
        let sent = Requester::send_message(self, chat_id, text)
            .await
            .map_err(|e| messaging_error("sendMessage", e))?;
        debug!(chat_id = %chat_id, message_id = sent.id.0, "Message sent");
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), MessagingError> {
        Requester::edit_message_text(self, chat_id, message_id, text)
            .await
            .map_err(|e| messaging_error("editMessageText", e))?;
        debug!(chat_id = %chat_id, message_id = message_id.0, "Message edited");
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), MessagingError> {
        let mut request =
            Requester::answer_callback_query(self, CallbackQueryId(callback_query_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        request
            .await
            .map_err(|e| messaging_error("answerCallbackQuery", e))?;
        debug!(callback_query_id, "Callback query answered");
        Ok(())
    }
}
