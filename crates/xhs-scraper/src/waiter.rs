//! Bounded waits for elements to appear in the live DOM.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;

use crate::error::ScrapeError;
use crate::page::{ElementRef, Page};

/// Waits for `selector` to match, bounded by `timeout`.
///
/// If the selector already matches, resolves immediately without creating a
/// mutation subscription. Otherwise subscribes to the page's mutation
/// notifications and re-queries on every tick. The subscription is dropped
/// on every exit path — resolution and timeout alike.
///
/// # Errors
///
/// Returns [`ScrapeError::ElementTimeout`] naming the selector when the
/// timeout elapses first.
pub async fn wait_for(
    page: &dyn Page,
    selector: &str,
    timeout: Duration,
) -> Result<ElementRef, ScrapeError> {
    if let Some(element) = page.query(selector) {
        return Ok(element);
    }

    let mut mutations = page.mutations();

    // The element may have appeared between the initial query and the
    // subscription; a tick for it would never arrive.
    if let Some(element) = page.query(selector) {
        return Ok(element);
    }

    let waited = tokio::time::timeout(timeout, async {
        loop {
            match mutations.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    if let Some(element) = page.query(selector) {
                        return element;
                    }
                }
                // Page torn down; nothing will ever match. Run out the clock.
                Err(RecvError::Closed) => std::future::pending::<()>().await,
            }
        }
    })
    .await;

    waited.map_err(|_| {
        tracing::debug!(selector, timeout_ms = timeout.as_millis() as u64, "element wait timed out");
        ScrapeError::ElementTimeout {
            selector: selector.to_owned(),
            timeout_ms: timeout.as_millis() as u64,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, FakePage};

    #[tokio::test]
    async fn resolves_immediately_without_subscribing() {
        let page = FakePage::new("https://www.xiaohongshu.com/user/profile/u1");
        page.insert(".user-name", FakeElement::with_text("Alice"));

        let element = wait_for(page.as_ref(), ".user-name", Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(element.text(), "Alice");
        assert_eq!(page.mutation_subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_when_element_appears_before_timeout() {
        let page = FakePage::new("https://www.xiaohongshu.com/user/profile/u1");
        page.insert_later(
            ".user-name",
            FakeElement::with_text("Alice"),
            Duration::from_millis(300),
        );

        let element = wait_for(page.as_ref(), ".user-name", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(element.text(), "Alice");
        // Subscription torn down once resolved.
        assert_eq!(page.mutation_subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_naming_the_selector() {
        let page = FakePage::new("https://www.xiaohongshu.com/user/profile/u1");

        let err = wait_for(page.as_ref(), ".never", Duration::from_millis(500))
            .await
            .unwrap_err();
        match err {
            ScrapeError::ElementTimeout {
                selector,
                timeout_ms,
            } => {
                assert_eq!(selector, ".never");
                assert_eq!(timeout_ms, 500);
            }
            other => panic!("expected ElementTimeout, got {other:?}"),
        }
        assert_eq!(page.mutation_subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_mutations_that_do_not_produce_a_match() {
        let page = FakePage::new("https://www.xiaohongshu.com/user/profile/u1");
        page.insert_later(
            ".other",
            FakeElement::with_text("noise"),
            Duration::from_millis(100),
        );
        page.insert_later(
            ".target",
            FakeElement::with_text("hit"),
            Duration::from_millis(200),
        );

        let element = wait_for(page.as_ref(), ".target", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(element.text(), "hit");
    }
}
