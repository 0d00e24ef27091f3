//! Synthetic in-app navigation into and out of a note's detail view.
//!
//! The page URL and its history entry are the one mutable resource the whole
//! batch shares: only one logical detail view exists at a time. This module
//! owns every mutation of it. Entering hands back a [`DetailViewGuard`] that
//! must be passed to [`NavigationSimulator::restore`] exactly once — the
//! fetcher does so on every path, since its failures are values rather than
//! unwinds.

use tokio::time::sleep;

use xhs_core::ScrapeTiming;

use crate::page::PageRef;

pub struct NavigationSimulator {
    page: PageRef,
    timing: ScrapeTiming,
}

/// Token for one entered detail view, holding the URL to restore.
#[must_use = "an entered detail view must be restored"]
pub struct DetailViewGuard {
    original_url: String,
    restored: bool,
}

impl DetailViewGuard {
    pub fn original_url(&self) -> &str {
        &self.original_url
    }
}

impl Drop for DetailViewGuard {
    fn drop(&mut self) {
        if !self.restored {
            // Cannot await in Drop; the page is left on the detail view and
            // the next iteration would scrape the wrong document.
            tracing::warn!(
                original_url = %self.original_url,
                "detail view guard dropped without restore"
            );
        }
    }
}

impl NavigationSimulator {
    pub fn new(page: PageRef, timing: ScrapeTiming) -> Self {
        Self { page, timing }
    }

    /// Drives the single-page app into the detail view at `url` without a
    /// reload: rewrite the visible URL, let the router begin transitioning,
    /// dispatch the synthetic navigation event, let the content render.
    pub async fn enter_detail_view(&self, url: &str) -> DetailViewGuard {
        let original_url = self.page.url();
        tracing::debug!(url, "entering note detail view");

        self.page.push_url(url);
        sleep(self.timing.enter_settle).await;
        self.page.dispatch_pop_state();
        sleep(self.timing.render_settle).await;

        DetailViewGuard {
            original_url,
            restored: false,
        }
    }

    /// Returns the page to its pre-fetch URL, with the same two-phase settle
    /// as entry. Consumes the guard; restoring twice is unrepresentable.
    pub async fn restore(&self, mut guard: DetailViewGuard) {
        tracing::debug!(url = %guard.original_url, "restoring original page");

        self.page.push_url(&guard.original_url);
        sleep(self.timing.enter_settle).await;
        self.page.dispatch_pop_state();
        sleep(self.timing.render_settle).await;

        guard.restored = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::testing::{FakePage, NavAction};

    const PROFILE: &str = "https://www.xiaohongshu.com/user/profile/u1";
    const DETAIL: &str = "https://www.xiaohongshu.com/explore/n1?xsec_token=T";

    #[tokio::test(start_paused = true)]
    async fn enter_then_restore_round_trips_the_url() {
        let page = FakePage::new(PROFILE);
        let nav = NavigationSimulator::new(page.clone(), ScrapeTiming::instant());

        let guard = nav.enter_detail_view(DETAIL).await;
        assert_eq!(page.url(), DETAIL);
        assert_eq!(guard.original_url(), PROFILE);

        nav.restore(guard).await;
        assert_eq!(page.url(), PROFILE);

        assert_eq!(
            page.nav_log(),
            vec![
                NavAction::PushUrl(DETAIL.to_owned()),
                NavAction::PopState,
                NavAction::PushUrl(PROFILE.to_owned()),
                NavAction::PopState,
            ]
        );
    }
}
