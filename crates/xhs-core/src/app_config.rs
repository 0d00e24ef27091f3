use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

/// Deployment configuration for the collaborators around the scraper:
/// the cloud-sync endpoint and the local record store.
#[derive(Clone)]
pub struct AppConfig {
    /// Endpoint receiving the JSON-encoded record via POST. `None` disables
    /// sync; scrapes still succeed with a failed sync outcome.
    pub sync_url: Option<String>,
    pub sync_timeout_secs: u64,
    /// JSON array file the record store appends to.
    pub store_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // sync_url may embed webhook tokens; keep it out of logs.
        f.debug_struct("AppConfig")
            .field("sync_url", &self.sync_url.as_ref().map(|_| "[redacted]"))
            .field("sync_timeout_secs", &self.sync_timeout_secs)
            .field("store_path", &self.store_path)
            .finish()
    }
}

/// Every wait the scraping path performs, in one place.
///
/// The defaults are the production pacing tuned against the live site:
/// generous settle delays after synthetic navigation and jittered gaps
/// between notes so the request cadence never looks mechanical. Tests
/// build an [`instant`](Self::instant) timing and drive the clock with
/// `tokio::time::pause`.
#[derive(Debug, Clone)]
pub struct ScrapeTiming {
    /// Upper bound on waiting for the profile header to render.
    pub profile_marker_timeout: Duration,
    /// Extra settle after the profile marker appears.
    pub profile_settle: Duration,
    /// Upper bound on waiting for detail-view markers; expiry is non-fatal.
    pub detail_marker_timeout: Duration,
    /// Settle after rewriting the URL, before the synthetic nav event.
    pub enter_settle: Duration,
    /// Settle after the nav event, while the view renders.
    pub render_settle: Duration,
    /// Jittered gap between consecutive note fetches, milliseconds.
    pub note_pacing_ms: Range<u64>,
    /// Shorter jittered gap after a failed note fetch.
    pub failure_pacing_ms: Range<u64>,
    /// How many leading cards get a detail fetch.
    pub max_detail_notes: usize,
}

impl Default for ScrapeTiming {
    fn default() -> Self {
        Self {
            profile_marker_timeout: Duration::from_secs(10),
            profile_settle: Duration::from_secs(2),
            detail_marker_timeout: Duration::from_secs(5),
            enter_settle: Duration::from_secs(3),
            render_settle: Duration::from_secs(2),
            note_pacing_ms: 2000..3000,
            failure_pacing_ms: 1000..2000,
            max_detail_notes: 10,
        }
    }
}

impl ScrapeTiming {
    /// Timing with all waits collapsed to zero, for tests.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            profile_marker_timeout: Duration::ZERO,
            profile_settle: Duration::ZERO,
            detail_marker_timeout: Duration::ZERO,
            enter_settle: Duration::ZERO,
            render_settle: Duration::ZERO,
            note_pacing_ms: 0..1,
            failure_pacing_ms: 0..1,
            max_detail_notes: 10,
        }
    }
}
