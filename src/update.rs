//! Inbound Telegram update schema.
//!
//! Only the fields the moderation flow reads are modelled; everything else in
//! the Bot API payload is ignored by serde. [`Update::into_event`] then reduces
//! a raw update to the one shape the dispatcher acts on.

use serde::Deserialize;
use teloxide::types::{ChatId, MessageId};

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub from: Option<User>,
    /// Message the pressed button was attached to
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i32,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// An inline button press
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPress {
    pub callback_id: String,
    /// Chat the button was pressed in
    ///
    /// When Telegram omits the message (inline-mode buttons), this is the
    /// presser's user id instead, so an admin pressing a button in their own
    /// private chat is still recognised. A message-only check would answer
    /// "Not authorized" there; the fallback is deliberate.
    pub chat_id: Option<ChatId>,
    /// Message carrying the button, if Telegram sent it along
    pub message_id: Option<MessageId>,
    pub data: String,
}

/// A text message, possibly replying to another one
#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to_text: Option<String>,
}

/// What the dispatcher should do with an update
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingEvent {
    ButtonPress(ButtonPress),
    Text(TextMessage),
    /// Any other update shape; acknowledged without action
    Ignored,
}

impl Update {
    /// Classify the update; callback queries take precedence over messages
    pub fn into_event(self) -> IncomingEvent {
        if let Some(query) = self.callback_query {
            let chat_id = query
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .or_else(|| query.from.as_ref().map(|u| ChatId(u.id)));

            return IncomingEvent::ButtonPress(ButtonPress {
                callback_id: query.id,
                chat_id,
                message_id: query.message.as_ref().map(|m| MessageId(m.message_id)),
                data: query.data.unwrap_or_default(),
            });
        }

        match self.message {
            Some(Message {
                chat,
                text: Some(text),
                reply_to_message,
                ..
            }) => IncomingEvent::Text(TextMessage {
                chat_id: chat.id,
                text,
                reply_to_text: reply_to_message.and_then(|m| m.text),
            }),
            _ => IncomingEvent::Ignored,
        }
    }
}
