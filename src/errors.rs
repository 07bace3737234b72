//! # Error Types Module
//!
//! This module defines the error types used throughout the webhook handling path.
//! Every error here is eventually masked behind the fixed `200 OK` webhook
//! response, so the variants exist for logging and failure reporting.

use thiserror::Error;

/// Errors raised while loading [`crate::config::BotConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    /// Building an outbound HTTP client failed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors returned by the record store client
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status
    #[error("store PATCH failed with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// The request never produced a response (connect error, timeout, ...)
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors returned by the Telegram Bot API client
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The Bot API answered with `"ok": false`
    #[error("telegram {method} failed: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
    /// The call failed before the Bot API could answer it (network, timeout,
    /// unparsable response, ...)
    #[error("telegram {method} request failed: {source}")]
    Request {
        method: &'static str,
        #[source]
        source: teloxide::RequestError,
    },
}

/// Failures that abort handling of a single update
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}
