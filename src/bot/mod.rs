//! Bot module for handling Telegram moderation updates
//!
//! This module is split into several submodules:
//! - `callback_handler`: Handles inline keyboard button presses (`action:hwid`)
//! - `message_handler`: Handles `/approve`, `/reject` and `/hold` text commands
//! - `ui_builder`: Formats the messages sent back to the admin
//!
//! [`ModerationBot`] ties them together: it owns the two API clients, applies
//! the admin check, and turns every failure into an observer report so the
//! webhook can always answer `200 OK`.

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

use std::sync::Arc;
use teloxide::types::ChatId;
use tracing::{debug, error, warn};

use crate::db::RecordStore;
use crate::errors::{HandlerError, MessagingError};
use crate::moderation::{Hwid, Status};
use crate::telegram::Messenger;
use crate::update::{IncomingEvent, Update};

use ui_builder::{format_store_failure, ALIVE_MESSAGE};

/// Receives every failure that is hidden from the webhook caller
pub trait FailureObserver: Send + Sync {
    fn on_failure(&self, error: &HandlerError);
}

/// Default observer: one `tracing` error event per failure
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn on_failure(&self, error: &HandlerError) {
        error!(error = %error, "Webhook error");
    }
}

/// Moderation logic shared by all webhook requests
#[derive(Clone)]
pub struct ModerationBot {
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn RecordStore>,
    observer: Arc<dyn FailureObserver>,
    admin_chat_id: Option<String>,
    report_failures_to_admin: bool,
}

impl ModerationBot {
    /// Create a bot; `admin_chat_id: None` lets every chat moderate
    pub fn new(
        messenger: Arc<dyn Messenger>,
        store: Arc<dyn RecordStore>,
        admin_chat_id: Option<String>,
    ) -> Self {
        Self {
            messenger,
            store,
            observer: Arc::new(TracingObserver),
            admin_chat_id,
            report_failures_to_admin: false,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn FailureObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Also send store failures to the admin chat
    pub fn report_failures_to_admin(mut self, enabled: bool) -> Self {
        self.report_failures_to_admin = enabled;
        self
    }

    pub fn messenger(&self) -> &dyn Messenger {
        self.messenger.as_ref()
    }

    /// Whether `chat_id` may moderate
    ///
    /// Ids are compared as strings, so `-100123` matches a configured `"-100123"`.
    pub fn is_admin(&self, chat_id: Option<ChatId>) -> bool {
        match &self.admin_chat_id {
            None => true,
            Some(admin) => chat_id.is_some_and(|id| id.0.to_string() == *admin),
        }
    }

    /// Numeric admin chat, when one is configured
    fn admin_chat(&self) -> Option<ChatId> {
        let admin = self.admin_chat_id.as_deref()?;
        match admin.parse::<i64>() {
            Ok(id) => Some(ChatId(id)),
            Err(_) => {
                warn!(admin_chat_id = %admin, "Admin chat id is not numeric, cannot message it");
                None
            }
        }
    }

    /// Handle a raw webhook body; never fails
    pub async fn handle_body(&self, body: &[u8]) {
        match serde_json::from_slice::<Update>(body) {
            Ok(update) => self.handle_update(update).await,
            Err(e) => warn!(error = %e, "Ignoring malformed update body"),
        }
    }

    /// Dispatch one update and report any failure to the observer
    pub async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;
        let outcome = match update.into_event() {
            IncomingEvent::ButtonPress(press) => callback_handler(self, press).await,
            IncomingEvent::Text(msg) => message_handler(self, msg).await,
            IncomingEvent::Ignored => {
                debug!(update_id = ?update_id, "Ignoring unsupported update");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            self.observer.on_failure(&e);
        }
    }

    /// Persist `status` for `hwid`, forwarding a failure to the admin if enabled
    pub(crate) async fn apply_status(&self, hwid: &Hwid, status: Status) -> Result<(), HandlerError> {
        match self.store.update_status(hwid, status).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if self.report_failures_to_admin {
                    if let Some(admin) = self.admin_chat() {
                        let text = format_store_failure(hwid, status, &e);
                        let sent = self.messenger.send_message(admin, &text).await;
                        self.notify(sent);
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Record the outcome of a best-effort Telegram call
    pub(crate) fn notify(&self, outcome: Result<(), MessagingError>) {
        if let Err(e) = outcome {
            self.observer.on_failure(&HandlerError::Messaging(e));
        }
    }

    /// Tell the admin the webhook is reachable
    pub async fn send_alive_notification(&self) {
        let Some(admin) = self.admin_chat() else {
            debug!("No admin chat configured, skipping alive notification");
            return;
        };
        let sent = self.messenger.send_message(admin, ALIVE_MESSAGE).await;
        self.notify(sent);
    }
}
