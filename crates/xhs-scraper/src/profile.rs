//! Top-level orchestrator for one profile scrape.

use std::sync::Arc;

use tokio::time::sleep;

use xhs_core::{clean_user_id, AuthorProfile, AuthorRecord, ScrapeTiming};

use crate::batch::BatchProcessor;
use crate::detail::{DetailFetcher, NoteDetailFetcher};
use crate::error::ScrapeError;
use crate::fields::{first_text, nth_text};
use crate::page::PageRef;
use crate::ports::{AuthorStore, Command, EventSink, SyncOutcome, SyncSink};
use crate::selectors;
use crate::waiter::wait_for;

/// Gathers profile fields, all note titles, and the batch of detail fetches;
/// assembles the aggregate record; hands it to persistence and sync; reports
/// the outcome through the event sink.
///
/// Error ceiling: any failure in this sequence is caught exactly once at
/// [`run`](Self::run) and reported as one `DATA_FAILED` event. Nothing is
/// persisted on that path — the record is assembled and stored only after
/// every scrape step succeeded.
pub struct ProfileScraper {
    page: PageRef,
    fetcher: Arc<dyn DetailFetcher>,
    store: Arc<dyn AuthorStore>,
    sync: Arc<dyn SyncSink>,
    events: Arc<dyn EventSink>,
    timing: ScrapeTiming,
}

impl ProfileScraper {
    pub fn new(
        page: PageRef,
        store: Arc<dyn AuthorStore>,
        sync: Arc<dyn SyncSink>,
        events: Arc<dyn EventSink>,
        timing: ScrapeTiming,
    ) -> Self {
        let fetcher: Arc<dyn DetailFetcher> =
            Arc::new(NoteDetailFetcher::new(page.clone(), timing.clone()));
        Self {
            page,
            fetcher,
            store,
            sync,
            events,
            timing,
        }
    }

    /// Like [`new`](Self::new) but with an injected detail fetcher.
    pub fn with_fetcher(
        page: PageRef,
        fetcher: Arc<dyn DetailFetcher>,
        store: Arc<dyn AuthorStore>,
        sync: Arc<dyn SyncSink>,
        events: Arc<dyn EventSink>,
        timing: ScrapeTiming,
    ) -> Self {
        Self {
            page,
            fetcher,
            store,
            sync,
            events,
            timing,
        }
    }

    /// Inbound message dispatch.
    pub async fn handle_command(&self, command: Command) {
        match command {
            Command::StartScrape { profile_url } => self.run(&profile_url).await,
        }
    }

    /// Runs one scrape and reports `DATA_READY` or exactly one `DATA_FAILED`.
    pub async fn run(&self, profile_url: &str) {
        tracing::info!(profile_url, "scrape started");
        match self.scrape(profile_url).await {
            Ok((record, sync)) => {
                tracing::info!(
                    id = %record.id,
                    notes = record.top_notes.len(),
                    sync_success = sync.success,
                    "scrape finished"
                );
                self.events.data_ready(&record, &sync).await;
            }
            Err(err) => {
                tracing::error!(%err, profile_url, "scrape failed");
                self.events.data_failed(&err.to_string()).await;
            }
        }
    }

    async fn scrape(
        &self,
        profile_url: &str,
    ) -> Result<(AuthorRecord, SyncOutcome), ScrapeError> {
        wait_for(
            self.page.as_ref(),
            selectors::PROFILE_MARKER,
            self.timing.profile_marker_timeout,
        )
        .await?;
        sleep(self.timing.profile_settle).await;

        let profile = self.extract_profile();
        tracing::info!(user_name = %profile.user_name, user_id = %profile.user_id, "profile header extracted");

        let all_titles: Vec<String> = self
            .page
            .query_all(selectors::FEED_TITLES)
            .iter()
            .map(|el| el.text().trim().to_owned())
            .collect();
        tracing::info!(count = all_titles.len(), "note titles collected");

        let cards = self.page.query_all(selectors::NOTE_CARDS);
        let batch = BatchProcessor::new(
            Arc::clone(&self.fetcher),
            self.timing.clone(),
            self.page.origin(),
        );
        let top_notes = batch.run(&cards, self.timing.max_detail_notes).await;

        let record = AuthorRecord::assemble(profile, all_titles, top_notes, profile_url);

        // Sync runs independently of the persistence outcome, and its own
        // outcome is data; neither reclassifies the other.
        let stored = self.store.append(&record).await;
        let sync = self.sync.submit(&record).await;
        stored?;

        Ok((record, sync))
    }

    fn extract_profile(&self) -> AuthorProfile {
        let page = self.page.as_ref();
        AuthorProfile {
            user_name: first_text(page, &[selectors::USER_NAME], ""),
            user_id: clean_user_id(&first_text(page, &[selectors::USER_RED_ID], "")),
            subscribers: nth_text(page, selectors::USER_INTERACTION_COUNTS, 0, "0"),
            followers: nth_text(page, selectors::USER_INTERACTION_COUNTS, 1, "0"),
            likes: nth_text(page, selectors::USER_INTERACTION_COUNTS, 2, "0"),
        }
    }
}
