//! One "visit a note, extract its fields, come back" operation.

use async_trait::async_trait;

use xhs_core::{sentinel, CardFallback, NoteDetail, ScrapeTiming};

use crate::error::ScrapeError;
use crate::fields::first_text;
use crate::nav::NavigationSimulator;
use crate::page::PageRef;
use crate::selectors;
use crate::waiter::wait_for;

/// Seam between the batch layer and the real navigation-driven fetcher, so
/// batch fault isolation can be exercised against substitutes.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_detail(
        &self,
        url: &str,
        fallback: &CardFallback,
    ) -> Result<NoteDetail, ScrapeError>;
}

/// Composes [`NavigationSimulator`], the element waiter, and the field
/// extractor into one detail fetch with guaranteed state restoration.
pub struct NoteDetailFetcher {
    page: PageRef,
    nav: NavigationSimulator,
    timing: ScrapeTiming,
}

impl NoteDetailFetcher {
    pub fn new(page: PageRef, timing: ScrapeTiming) -> Self {
        let nav = NavigationSimulator::new(page.clone(), timing.clone());
        Self { page, nav, timing }
    }

    /// Fetches one note's detail fields. Infallible by construction: every
    /// failure degrades to card-level fallbacks or sentinel strings, and the
    /// original URL is restored before returning on every path.
    pub async fn fetch(&self, url: &str, fallback: &CardFallback) -> NoteDetail {
        if url.is_empty() {
            tracing::debug!(title = %fallback.title, "no detail link; using card fields");
            return NoteDetail {
                title: fallback.title.clone(),
                desc: sentinel::LINK_UNAVAILABLE.to_owned(),
                like: fallback.like.clone(),
                collect: "0".to_owned(),
            };
        }

        let guard = self.nav.enter_detail_view(url).await;
        let detail = self.extract(fallback).await;
        // Always runs: extraction cannot unwind, its failures are fallbacks.
        self.nav.restore(guard).await;

        tracing::info!(title = %detail.title, "note detail fetched");
        detail
    }

    async fn extract(&self, fallback: &CardFallback) -> NoteDetail {
        if let Err(err) = wait_for(
            self.page.as_ref(),
            selectors::DETAIL_MARKERS,
            self.timing.detail_marker_timeout,
        )
        .await
        {
            // Non-fatal: the view may have rendered a variant without any
            // marker; extraction below still degrades field by field.
            tracing::warn!(%err, "detail view markers never appeared");
        }

        let page = self.page.as_ref();
        NoteDetail {
            title: first_text(page, selectors::DETAIL_TITLE, &fallback.title),
            desc: first_text(page, selectors::DETAIL_DESC, sentinel::NO_DESC),
            like: first_text(page, selectors::DETAIL_LIKE, &fallback.like),
            collect: first_text(page, selectors::DETAIL_COLLECT, "0"),
        }
    }
}

#[async_trait]
impl DetailFetcher for NoteDetailFetcher {
    async fn fetch_detail(
        &self,
        url: &str,
        fallback: &CardFallback,
    ) -> Result<NoteDetail, ScrapeError> {
        Ok(self.fetch(url, fallback).await)
    }
}
