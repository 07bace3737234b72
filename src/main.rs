use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hwid_approval_bot::bot::ModerationBot;
use hwid_approval_bot::config::BotConfig;
use hwid_approval_bot::db::SupabaseStore;
use hwid_approval_bot::telegram::telegram_bot;
use hwid_approval_bot::webhook::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting HWID approval webhook");

    let config = BotConfig::from_env()?;
    info!(config = ?config, "Configuration loaded");

    let messenger = Arc::new(telegram_bot(&config.telegram, config.http_timeout)?);
    let store = Arc::new(SupabaseStore::new(&config.store, config.http_timeout)?);

    let bot = ModerationBot::new(messenger, store, config.admin_chat_id.clone())
        .report_failures_to_admin(config.report_failures_to_admin);
    let state = AppState::new(bot, config.webhook_secret.clone())
        .with_alive_notification(config.alive_notification);

    webhook::serve(config.bind_addr, state).await?;

    info!("Webhook server stopped");
    Ok(())
}

/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
