//! # Webhook Server Module
//!
//! HTTP front of the bot. Telegram disables or retry-storms a webhook that
//! answers with anything but 2xx, so every request, whatever happens while
//! handling it, gets `200 OK` with body `OK`.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use crate::bot::ModerationBot;
use crate::config::SECRET_TOKEN_HEADER;

/// Path Telegram is pointed at; the root path is served as well
pub const WEBHOOK_PATH: &str = "/api/telegram-webhook";

const OK_BODY: &str = "OK";

#[derive(Clone)]
pub struct AppState {
    bot: ModerationBot,
    webhook_secret: Option<String>,
    alive_notification: bool,
    alive_sent: Arc<AtomicBool>,
}

impl AppState {
    /// `webhook_secret: None` disables the secret token check
    pub fn new(bot: ModerationBot, webhook_secret: Option<String>) -> Self {
        Self {
            bot,
            webhook_secret,
            alive_notification: false,
            alive_sent: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Message the admin once, on the first non-POST request
    pub fn with_alive_notification(mut self, enabled: bool) -> Self {
        self.alive_notification = enabled;
        self
    }

    fn spawn_alive_notification(&self) {
        if !self.alive_notification || self.alive_sent.swap(true, Ordering::SeqCst) {
            return;
        }
        let bot = self.bot.clone();
        tokio::spawn(async move { bot.send_alive_notification().await });
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handle_webhook))
        .route(WEBHOOK_PATH, any(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the webhook on `addr` until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Telegram webhook server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Compare the secret token header in constant time
fn secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SECRET_TOKEN_HEADER)
        .map(|v| bool::from(v.as_bytes().ct_eq(expected.as_bytes())))
        .unwrap_or(false)
}

#[instrument(name = "telegram.webhook", skip_all, fields(method = %method))]
async fn handle_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    if method != Method::POST {
        debug!("Health check");
        state.spawn_alive_notification();
        return (StatusCode::OK, OK_BODY);
    }

    if !secret_matches(state.webhook_secret.as_deref(), &headers) {
        warn!("Rejected update with missing or wrong secret token");
        return (StatusCode::OK, OK_BODY);
    }

    state.bot.handle_body(&body).await;
    (StatusCode::OK, OK_BODY)
}
