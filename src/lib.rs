//! # HWID Approval Bot
//!
//! A Telegram webhook that lets a single admin chat approve, reject or hold
//! hardware identifiers (HWIDs) stored in a Supabase table, either with inline
//! buttons or with `/approve`, `/reject` and `/hold` commands.

pub mod bot;
pub mod config;
pub mod db;
pub mod errors;
pub mod hwid_patterns;
pub mod moderation;
pub mod telegram;
pub mod update;
pub mod webhook;
