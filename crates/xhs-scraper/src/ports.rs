//! Collaborator ports around the scrape: persistence, cloud sync, and the
//! outbound/inbound message surface.
//!
//! The orchestrator depends on these traits, never on concrete
//! implementations; [`crate::store`] and [`crate::sync`] provide the
//! production ones, [`crate::testing`] the doubles.

use async_trait::async_trait;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use xhs_core::AuthorRecord;

use crate::error::ScrapeError;

/// Result of one cloud-sync submission. Carried as data on the success
/// path: a failed sync never fails the scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Inbound trigger from the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartScrape { profile_url: String },
}

/// Outbound report of one scrape invocation's outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    DataReady {
        record: AuthorRecord,
        sync: SyncOutcome,
    },
    DataFailed {
        error: String,
    },
}

/// Append-only persistence for assembled records. Append is idempotent on
/// the record id; implementations never mutate a stored record.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn append(&self, record: &AuthorRecord) -> Result<(), ScrapeError>;
}

/// Outbound cloud sync. Infallible by signature: transport and status
/// failures become a failed [`SyncOutcome`].
#[async_trait]
pub trait SyncSink: Send + Sync {
    async fn submit(&self, record: &AuthorRecord) -> SyncOutcome;
}

/// Outbound messaging to whatever hosts the scraper.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn data_ready(&self, record: &AuthorRecord, sync: &SyncOutcome);
    async fn data_failed(&self, error: &str);
}

/// [`EventSink`] over a tokio channel — the in-process analog of the
/// extension's runtime message port.
pub struct ChannelSink {
    tx: mpsc::Sender<ScrapeEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ScrapeEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn data_ready(&self, record: &AuthorRecord, sync: &SyncOutcome) {
        let event = ScrapeEvent::DataReady {
            record: record.clone(),
            sync: sync.clone(),
        };
        if self.tx.send(event).await.is_err() {
            tracing::warn!("event channel closed; DATA_READY dropped");
        }
    }

    async fn data_failed(&self, error: &str) {
        let event = ScrapeEvent::DataFailed {
            error: error.to_owned(),
        };
        if self.tx.send(event).await.is_err() {
            tracing::warn!("event channel closed; DATA_FAILED dropped");
        }
    }
}
