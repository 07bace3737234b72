//! # HWID Patterns Module
//!
//! This module contains the regex patterns used for HWID and command detection.

use lazy_static::lazy_static;
use regex::Regex;

/// Number of hex digits in a hardware identifier
pub const HWID_LENGTH: usize = 64;

/// An HWID anywhere inside a longer text; the first match wins
pub const HWID_PATTERN: &str = r"[A-Fa-f0-9]{64}";

/// A moderation command, e.g. `/approve`, `/Hold@my_bot <hwid>`
pub const COMMAND_PATTERN: &str =
    r"(?i)^/(approve|reject|hold)(?:@\w+)?(?:\s+([a-f0-9]{64}))?$";

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref HWID_REGEX: Regex =
        Regex::new(HWID_PATTERN).expect("HWID pattern should be valid");
    pub static ref COMMAND_REGEX: Regex =
        Regex::new(COMMAND_PATTERN).expect("Command pattern should be valid");
}
