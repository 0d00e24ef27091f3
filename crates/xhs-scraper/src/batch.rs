//! Sequential, paced, fault-isolated batch of note detail fetches.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use xhs_core::{CardFallback, NoteDetail, ScrapeTiming};

use crate::detail::DetailFetcher;
use crate::fields::first_text;
use crate::link::resolve_detail_url;
use crate::page::{Element, ElementRef};
use crate::selectors;

/// Drives the detail fetcher over the leading note cards.
///
/// Strictly sequential: the page's navigation state is the one shared
/// resource, only one detail view exists at a time, and a parallel cadence
/// is also the loudest anti-automation signal there is. Each item failure is
/// contained at its own slot; the batch never aborts and never retries.
pub struct BatchProcessor {
    fetcher: Arc<dyn DetailFetcher>,
    timing: ScrapeTiming,
    origin: String,
}

impl BatchProcessor {
    pub fn new(fetcher: Arc<dyn DetailFetcher>, timing: ScrapeTiming, origin: String) -> Self {
        Self {
            fetcher,
            timing,
            origin,
        }
    }

    /// Processes `min(limit, cards.len())` cards in document order and
    /// returns exactly that many details. A failed slot holds
    /// [`NoteDetail::failure_sentinel`]; between non-final items the loop
    /// sleeps a jittered duration so the request cadence never looks uniform.
    pub async fn run(&self, cards: &[ElementRef], limit: usize) -> Vec<NoteDetail> {
        let count = limit.min(cards.len());
        tracing::info!(count, total_cards = cards.len(), "fetching note details");

        let mut notes = Vec::with_capacity(count);
        for (index, card) in cards.iter().take(count).enumerate() {
            let (note, pacing) = match self.process_card(card.as_ref()).await {
                Ok(note) => (note, &self.timing.note_pacing_ms),
                Err(err) => {
                    tracing::error!(note = index + 1, %err, "note fetch failed; recording sentinel");
                    (NoteDetail::failure_sentinel(), &self.timing.failure_pacing_ms)
                }
            };
            notes.push(note);

            if index + 1 < count {
                jittered_sleep(pacing).await;
            }
        }
        notes
    }

    async fn process_card(&self, card: &dyn Element) -> Result<NoteDetail, crate::ScrapeError> {
        let fallback = CardFallback {
            title: first_text(card, &[selectors::CARD_TITLE], ""),
            like: first_text(card, &[selectors::CARD_LIKE_COUNT], "0"),
        };
        let url = resolve_detail_url(card, &self.origin);
        self.fetcher.fetch_detail(&url, &fallback).await
    }
}

async fn jittered_sleep(range: &Range<u64>) {
    let ms = rand::rng().random_range(range.clone());
    tracing::debug!(ms, "pacing before next note");
    sleep(Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, StubFetcher};

    /// A card whose fallback title is `title` and whose anchors resolve to a
    /// detail URL for `note_id`.
    fn card_with_link(title: &str, note_id: &str) -> ElementRef {
        let card = FakeElement::with_text("");
        card.insert(selectors::CARD_TITLE, FakeElement::with_text(title));
        card.insert(selectors::CARD_LIKE_COUNT, FakeElement::with_text("7"));
        card.insert(
            selectors::EXPLORE_ANCHOR,
            FakeElement::anchor(&format!("/explore/{note_id}")),
        );
        card.insert(
            selectors::COVER_ANCHOR,
            FakeElement::anchor(&format!("/explore/{note_id}?xsec_token=T&xsec_source=pc")),
        );
        card
    }

    fn echo_processor(fetcher: Arc<StubFetcher>) -> BatchProcessor {
        BatchProcessor::new(
            fetcher,
            ScrapeTiming::instant(),
            "https://www.xiaohongshu.com".to_owned(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn twelve_cards_with_limit_ten_yield_ten_results_in_order() {
        let cards: Vec<ElementRef> = (0..12)
            .map(|i| card_with_link(&format!("note-{i}"), &format!("id{i}")))
            .collect();
        let fetcher = StubFetcher::echoing();
        let processor = echo_processor(fetcher.clone());

        let notes = processor.run(&cards, 10).await;

        assert_eq!(notes.len(), 10);
        for (i, note) in notes.iter().enumerate() {
            assert_eq!(note.title, format!("note-{i}"));
        }
        // Cards 10 and 11 were never touched.
        assert_eq!(fetcher.calls().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_at_index_two_is_isolated_to_its_slot() {
        let cards: Vec<ElementRef> = (0..10)
            .map(|i| card_with_link(&format!("note-{i}"), &format!("id{i}")))
            .collect();
        let fetcher = StubFetcher::echoing().failing_at(2);
        let processor = echo_processor(fetcher);

        let notes = processor.run(&cards, 10).await;

        assert_eq!(notes.len(), 10);
        assert_eq!(notes[2], NoteDetail::failure_sentinel());
        for (i, note) in notes.iter().enumerate() {
            if i != 2 {
                assert_eq!(note.title, format!("note-{i}"));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cardless_link_passes_empty_url_to_fetcher() {
        let card = FakeElement::with_text("");
        card.insert(selectors::CARD_TITLE, FakeElement::with_text("orphan"));
        let cards: Vec<ElementRef> = vec![card];
        let fetcher = StubFetcher::echoing();
        let processor = echo_processor(fetcher.clone());

        let notes = processor.run(&cards, 10).await;

        assert_eq!(notes.len(), 1);
        let calls = fetcher.calls();
        assert_eq!(calls[0].0, "");
        assert_eq!(calls[0].1.title, "orphan");
        assert_eq!(calls[0].1.like, "0");
    }

    #[tokio::test(start_paused = true)]
    async fn limit_larger_than_card_count_processes_all_cards() {
        let cards: Vec<ElementRef> = (0..3)
            .map(|i| card_with_link(&format!("note-{i}"), &format!("id{i}")))
            .collect();
        let processor = echo_processor(StubFetcher::echoing());

        let notes = processor.run(&cards, 10).await;
        assert_eq!(notes.len(), 3);
    }
}
