//! Recording fakes of the bot's collaborators, shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, MessageId};

use hwid_approval_bot::bot::{FailureObserver, ModerationBot};
use hwid_approval_bot::db::RecordStore;
use hwid_approval_bot::errors::{HandlerError, MessagingError, StoreError};
use hwid_approval_bot::moderation::{Hwid, Status};
use hwid_approval_bot::telegram::Messenger;

pub const ADMIN_CHAT: i64 = -1001234567890;
pub const OTHER_CHAT: i64 = 555;
pub const HWID: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: ChatId,
        text: String,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    Answer {
        callback_query_id: String,
        text: Option<String>,
    },
}

#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, call: Sent) -> Result<(), MessagingError> {
        self.sent.lock().unwrap().push(call);
        if self.fail {
            return Err(MessagingError::Api {
                method: "test",
                description: "Bad Request: message is not modified".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), MessagingError> {
        self.record(Sent::Message {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), MessagingError> {
        self.record(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        })
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), MessagingError> {
        self.record(Sent::Answer {
            callback_query_id: callback_query_id.to_string(),
            text: text.map(str::to_string),
        })
    }
}

/// In-memory table of HWID records
#[derive(Default)]
pub struct RecordingStore {
    pub updates: Mutex<Vec<(String, Status)>>,
    pub records: Mutex<HashMap<String, Status>>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn updates(&self) -> Vec<(String, Status)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn status_of(&self, hwid: &str) -> Option<Status> {
        self.records.lock().unwrap().get(hwid).copied()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn update_status(&self, hwid: &Hwid, status: Status) -> Result<(), StoreError> {
        self.updates
            .lock()
            .unwrap()
            .push((hwid.as_str().to_string(), status));
        if self.fail {
            return Err(StoreError::Rejected {
                status: 401,
                body: r#"{"message":"Invalid API key"}"#.to_string(),
            });
        }
        self.records
            .lock()
            .unwrap()
            .insert(hwid.as_str().to_string(), status);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl FailureObserver for RecordingObserver {
    fn on_failure(&self, error: &HandlerError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

pub struct Harness {
    pub bot: ModerationBot,
    pub messenger: Arc<RecordingMessenger>,
    pub store: Arc<RecordingStore>,
    pub observer: Arc<RecordingObserver>,
}

pub fn harness_with(
    messenger: RecordingMessenger,
    store: RecordingStore,
    admin_chat_id: Option<&str>,
) -> Harness {
    let messenger = Arc::new(messenger);
    let store = Arc::new(store);
    let observer = Arc::new(RecordingObserver::default());
    let bot = ModerationBot::new(
        messenger.clone(),
        store.clone(),
        admin_chat_id.map(str::to_string),
    )
    .with_observer(observer.clone());

    Harness {
        bot,
        messenger,
        store,
        observer,
    }
}

/// Admin-restricted bot with healthy collaborators
pub fn harness() -> Harness {
    harness_with(
        RecordingMessenger::default(),
        RecordingStore::default(),
        Some(ADMIN_CHAT.to_string().as_str()),
    )
}

pub fn callback_update(chat_id: i64, data: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": 100,
        "callback_query": {
            "id": "4382bfdwdsb323b2d9",
            "from": { "id": 42, "is_bot": false, "first_name": "Admin" },
            "chat_instance": "-123",
            "message": {
                "message_id": 77,
                "date": 1700000000,
                "chat": { "id": chat_id, "type": "supergroup" },
                "text": format!("New HWID request\n\nHWID: {HWID}")
            },
            "data": data
        }
    })
}

pub fn text_update(chat_id: i64, text: &str, reply_to: Option<&str>) -> serde_json::Value {
    let mut message = serde_json::json!({
        "message_id": 90,
        "date": 1700000000,
        "chat": { "id": chat_id, "type": "private" },
        "text": text
    });
    if let Some(reply) = reply_to {
        message["reply_to_message"] = serde_json::json!({
            "message_id": 77,
            "date": 1699999999,
            "chat": { "id": chat_id, "type": "private" },
            "text": reply
        });
    }
    serde_json::json!({ "update_id": 101, "message": message })
}
