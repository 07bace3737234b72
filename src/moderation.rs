//! # Moderation Types Module
//!
//! Core value types of the moderation flow: the [`Action`] an admin requests,
//! the [`Status`] persisted for a hardware identifier, and the validated
//! [`Hwid`] itself. Parsing of button payloads and slash commands lives here
//! so both handlers share a single definition of what is acceptable.

use serde::Serialize;
use std::fmt;

use crate::hwid_patterns::{COMMAND_REGEX, HWID_LENGTH, HWID_REGEX};

/// A moderation action requested by the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve,
    Reject,
    Hold,
}

impl Action {
    /// Parse an action keyword as it appears in callback payloads (exact, lowercase)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "approve" => Some(Action::Approve),
            "reject" => Some(Action::Reject),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Hold => "hold",
        }
    }

    /// The status this action moves a record to
    pub fn status(self) -> Status {
        match self {
            Action::Approve => Status::Approved,
            Action::Reject => Status::Rejected,
            Action::Hold => Status::Hold,
        }
    }
}

/// Persisted approval state of an HWID record
///
/// Any status may be replaced by any other; the store update is a plain overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Approved,
    Rejected,
    Hold,
}

impl Status {
    /// Value written to the store's `status` column
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Approved => "approved",
            Status::Rejected => "rejected",
            Status::Hold => "hold",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Status::Approved => "✅",
            Status::Rejected => "❌",
            Status::Hold => "⏸️",
        }
    }

    /// Upper-case label used in admin-facing messages
    pub fn label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 64-digit hexadecimal hardware identifier
///
/// Matching is case-insensitive but the original casing is kept, since the
/// store filters on exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hwid(String);

impl Hwid {
    /// Accept `candidate` only if it is exactly 64 hex digits
    pub fn parse(candidate: &str) -> Option<Self> {
        if candidate.len() == HWID_LENGTH && candidate.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(candidate.to_string()))
        } else {
            None
        }
    }

    /// Extract the first HWID found anywhere in `text`
    pub fn find_in(text: &str) -> Option<Self> {
        HWID_REGEX.find(text).map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hwid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A slash command sent as a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationCommand {
    pub action: Action,
    /// HWID given inline; `None` means it must come from the replied-to message
    pub hwid: Option<Hwid>,
}

/// Parse `/approve`, `/reject` or `/hold`, optionally followed by an HWID
///
/// Keywords are case-insensitive. Surrounding whitespace is ignored. Any other
/// text yields `None`.
pub fn parse_command(text: &str) -> Option<ModerationCommand> {
    let captures = COMMAND_REGEX.captures(text.trim())?;
    let action = Action::from_keyword(&captures[1].to_lowercase())?;
    let hwid = captures.get(2).and_then(|m| Hwid::parse(m.as_str()));

    Some(ModerationCommand { action, hwid })
}

/// Parse an inline button payload of the form `action:hwid`
///
/// The payload is split on the first colon. Unknown actions and anything that
/// is not a well-formed HWID are rejected.
pub fn parse_callback_data(data: &str) -> Option<(Action, Hwid)> {
    let (keyword, hwid) = data.split_once(':')?;
    let action = Action::from_keyword(keyword)?;
    let hwid = Hwid::parse(hwid)?;

    Some((action, hwid))
}
