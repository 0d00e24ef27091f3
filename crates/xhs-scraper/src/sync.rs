//! Outbound cloud sync: POST the JSON-encoded record to a configured
//! endpoint, typically an n8n webhook.
//!
//! Sync is a separate failure domain from the scrape itself — every failure
//! here becomes a failed [`SyncOutcome`], never an error the orchestrator
//! has to handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use xhs_core::{AppConfig, AuthorRecord};

use crate::error::ScrapeError;
use crate::ports::{SyncOutcome, SyncSink};

pub struct HttpSync {
    client: Client,
    endpoint: String,
}

impl HttpSync {
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Picks the sink the configuration calls for: HTTP when an endpoint is
    /// set, otherwise the disabled sink that reports every submit as failed.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Arc<dyn SyncSink>, ScrapeError> {
        match &config.sync_url {
            Some(url) => Ok(Arc::new(Self::new(url.clone(), config.sync_timeout_secs)?)),
            None => {
                tracing::warn!("XHS_SYNC_URL not set; cloud sync disabled");
                Ok(Arc::new(DisabledSync))
            }
        }
    }
}

#[async_trait]
impl SyncSink for HttpSync {
    async fn submit(&self, record: &AuthorRecord) -> SyncOutcome {
        tracing::info!(user_name = %record.profile.user_name, "syncing author record");

        let response = match self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%err, "sync request failed");
                return SyncOutcome::failed(err.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "sync endpoint rejected the record");
            return SyncOutcome::failed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            ));
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                tracing::info!(%body, "cloud sync succeeded");
                SyncOutcome::ok()
            }
            Err(err) => {
                tracing::error!(%err, "sync endpoint returned an unreadable body");
                SyncOutcome::failed(err.to_string())
            }
        }
    }
}

/// Sink used when no endpoint is configured: the scrape proceeds and the
/// outcome records that nothing was synced.
///
/// The error string is the wire value downstream consumers already match
/// on, like the sentinel strings in [`xhs_core::author`].
pub struct DisabledSync;

#[async_trait]
impl SyncSink for DisabledSync {
    async fn submit(&self, _record: &AuthorRecord) -> SyncOutcome {
        tracing::warn!("cloud sync skipped: no endpoint configured");
        SyncOutcome::failed("未配置API地址")
    }
}
