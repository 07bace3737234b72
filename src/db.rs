//! # Record Store Module
//!
//! HWID approval records live in a Supabase (PostgREST) table. The bot never
//! creates, reads or deletes rows; it only overwrites the `status` column of
//! the row whose `hwid` equals the given identifier.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::errors::{ConfigError, StoreError};
use crate::moderation::{Hwid, Status};

/// Persistence operations used by the handlers
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Set the status of the record keyed by `hwid`
    ///
    /// Idempotent: writing the same status twice leaves the record unchanged.
    async fn update_status(&self, hwid: &Hwid, status: Status) -> Result<(), StoreError>;
}

/// Body of the partial update
#[derive(Debug, Serialize)]
pub struct StatusPatch {
    pub status: Status,
}

/// [`RecordStore`] backed by the Supabase REST API
#[derive(Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    endpoint: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{}", config.url, config.table),
            service_key: config.service_key.clone(),
        })
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn update_status(&self, hwid: &Hwid, status: Status) -> Result<(), StoreError> {
        debug!(hwid = %hwid, status = %status, "Patching HWID record");

        let response = self
            .http
            .patch(&self.endpoint)
            .query(&[("hwid", format!("eq.{hwid}"))])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(&StatusPatch { status })
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: code.as_u16(),
                body,
            });
        }

        info!(hwid = %hwid, status = %status, "HWID status updated");
        Ok(())
    }
}
