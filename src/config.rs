//! # Configuration Module
//!
//! This module defines the runtime configuration of the webhook service. The
//! configuration is resolved once at startup from environment variables and
//! passed explicitly to the components that need it.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::ConfigError;

// Constants for default configuration
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_STORE_TABLE: &str = "hwid_approvals";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Header Telegram uses to echo the secret registered with `setWebhook`
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Connection settings for the Telegram Bot API
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Base URL of the Bot API, without trailing slash
    pub api_url: String,
}

/// Connection settings for the Supabase REST store
#[derive(Clone)]
pub struct StoreConfig {
    /// Project URL, without trailing slash
    pub url: String,
    /// Service role key, sent both as `apikey` and as bearer token
    pub service_key: String,
    /// Table holding one row per HWID
    pub table: String,
}

/// Top-level configuration for the webhook service
///
/// Resolved from environment variables:
/// - `TELEGRAM_BOT_TOKEN` (required)
/// - `SUPABASE_URL` (required)
/// - `SUPABASE_SERVICE_KEY` (required)
/// - `ADMIN_CHAT_ID`: only this chat may moderate (default: unrestricted);
///   `TELEGRAM_ADMIN_CHAT_ID` is read when it is unset
/// - `WEBHOOK_SECRET_TOKEN`: expected secret token header (default: not checked);
///   `TELEGRAM_WEBHOOK_SECRET` is read when it is unset
/// - `TELEGRAM_API_URL` (default: `https://api.telegram.org`)
/// - `SUPABASE_TABLE` (default: `hwid_approvals`)
/// - `HTTP_TIMEOUT_SECS`: timeout for outbound calls (default: 10)
/// - `BIND_ADDR` (default: `0.0.0.0:8080`)
/// - `ALIVE_NOTIFICATION`: tell the admin once when the first health check arrives (default: false)
/// - `REPORT_FAILURES_TO_ADMIN`: forward store failures to the admin chat (default: false)
#[derive(Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub store: StoreConfig,
    pub admin_chat_id: Option<String>,
    pub webhook_secret: Option<String>,
    pub http_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub alive_notification: bool,
    pub report_failures_to_admin: bool,
}

impl BotConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_value("HTTP_TIMEOUT_SECS", &raw)?),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => parse_value("BIND_ADDR", &raw)?,
            None => parse_value("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: require("TELEGRAM_BOT_TOKEN")?,
                api_url: get("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
            store: StoreConfig {
                url: require("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                service_key: require("SUPABASE_SERVICE_KEY")?,
                table: get("SUPABASE_TABLE").unwrap_or_else(|| DEFAULT_STORE_TABLE.to_string()),
            },
            admin_chat_id: get("ADMIN_CHAT_ID").or_else(|| get("TELEGRAM_ADMIN_CHAT_ID")),
            webhook_secret: get("WEBHOOK_SECRET_TOKEN")
                .or_else(|| get("TELEGRAM_WEBHOOK_SECRET")),
            http_timeout,
            bind_addr,
            alive_notification: parse_flag("ALIVE_NOTIFICATION", get("ALIVE_NOTIFICATION"))?,
            report_failures_to_admin: parse_flag(
                "REPORT_FAILURES_TO_ADMIN",
                get("REPORT_FAILURES_TO_ADMIN"),
            )?,
        })
    }
}

fn parse_value<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            var,
            value: other.to_string(),
        }),
    }
}

// Credentials stay out of logs
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_api_url", &self.telegram.api_url)
            .field("store_url", &self.store.url)
            .field("store_table", &self.store.table)
            .field("admin_chat_id", &self.admin_chat_id)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("alive_notification", &self.alive_notification)
            .field("report_failures_to_admin", &self.report_failures_to_admin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("SUPABASE_URL", "https://project.supabase.co/"),
        ("SUPABASE_SERVICE_KEY", "service-key"),
    ];

    #[test]
    fn test_defaults_when_only_required_vars_set() {
        let config = BotConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.store.url, "https://project.supabase.co");
        assert_eq!(config.store.table, "hwid_approvals");
        assert!(config.admin_chat_id.is_none());
        assert!(config.webhook_secret.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.alive_notification);
        assert!(!config.report_failures_to_admin);
    }

    #[test]
    fn test_reads_optional_vars() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("TELEGRAM_ADMIN_CHAT_ID", "-1001234"),
            ("TELEGRAM_WEBHOOK_SECRET", "s3cret"),
            ("SUPABASE_TABLE", "devices"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("ALIVE_NOTIFICATION", "TRUE"),
            ("REPORT_FAILURES_TO_ADMIN", "1"),
        ]);

        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.admin_chat_id.as_deref(), Some("-1001234"));
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.store.table, "devices");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.alive_notification);
        assert!(config.report_failures_to_admin);
    }

    #[test]
    fn test_reads_deployment_admin_and_secret_names() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([("ADMIN_CHAT_ID", "7557313062"), ("WEBHOOK_SECRET_TOKEN", "lola2")]);

        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.admin_chat_id.as_deref(), Some("7557313062"));
        assert_eq!(config.webhook_secret.as_deref(), Some("lola2"));
    }

    #[test]
    fn test_deployment_names_win_over_prefixed_names() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("ADMIN_CHAT_ID", "7557313062"),
            ("TELEGRAM_ADMIN_CHAT_ID", "-1001234"),
            ("WEBHOOK_SECRET_TOKEN", "lola2"),
            ("TELEGRAM_WEBHOOK_SECRET", "s3cret"),
        ]);

        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.admin_chat_id.as_deref(), Some("7557313062"));
        assert_eq!(config.webhook_secret.as_deref(), Some("lola2"));
    }

    #[test]
    fn test_missing_required_var_is_an_error() {
        let err = BotConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_SERVICE_KEY")));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("WEBHOOK_SECRET_TOKEN", "  "));

        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("HTTP_TIMEOUT_SECS", "soon"));

        let err = BotConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HTTP_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("WEBHOOK_SECRET_TOKEN", "s3cret"));
        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("123:abc"));
        assert!(!rendered.contains("service-key"));
        assert!(!rendered.contains("s3cret"));
    }
}
