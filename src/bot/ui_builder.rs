//! UI Builder module for formatting admin-facing messages

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::StoreError;
use crate::moderation::{Action, Hwid, Status};

pub const NOT_AUTHORIZED: &str = "Not authorized";
pub const INVALID_ACTION: &str = "Invalid action";
pub const ALIVE_MESSAGE: &str = "Webhook alive ✅";

/// Toast shown when a button press was applied, e.g. `HWID approved`
pub fn format_callback_confirmation(status: Status) -> String {
    format!("HWID {status}")
}

/// Replacement text for the message that carried the moderation buttons
pub fn format_status_update(status: Status, hwid: &Hwid, updated_at: DateTime<Utc>) -> String {
    format!(
        "{} HWID {}\n\nHWID: {}\n\nUpdated at {}",
        status.glyph(),
        status.label(),
        hwid,
        updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Reply to a text command that was applied
pub fn format_command_confirmation(status: Status, hwid: &Hwid) -> String {
    format!("✅ Status updated to {} for HWID {}", status.label(), hwid)
}

/// Reply to a text command that named no HWID and replied to nothing usable
pub fn format_missing_hwid(action: Action) -> String {
    format!(
        "❌ Missing HWID. Reply to the HWID message with /{} or include the HWID.",
        action.keyword()
    )
}

pub fn format_store_failure(hwid: &Hwid, status: Status, error: &StoreError) -> String {
    format!(
        "⚠️ Failed to update HWID {} to {}: {}",
        hwid,
        status.label(),
        error
    )
}
