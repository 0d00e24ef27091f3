//! Narrow traits over the host page environment.
//!
//! The scraper never owns a browser; it is handed an already-loaded page and
//! scripts it through these traits. A production binding wraps a real session
//! (CDP, WebDriver, an extension bridge); [`crate::testing`] provides
//! in-memory doubles.
//!
//! Host calls are modeled infallible: rewriting the visible URL and
//! dispatching a synthetic navigation event cannot meaningfully fail while
//! the page exists, and a dead page surfaces as element waits timing out.

use std::sync::Arc;

use tokio::sync::broadcast;

pub type ElementRef = Arc<dyn Element>;
pub type PageRef = Arc<dyn Page>;

/// Anything that can be queried with a CSS selector: the page itself or one
/// element scoping the search to its subtree.
pub trait Queryable {
    /// First match in document order, if any.
    fn query(&self, selector: &str) -> Option<ElementRef>;

    /// All matches, document order.
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;
}

/// One element of the live DOM tree.
pub trait Element: Queryable + Send + Sync {
    /// Rendered text content, untrimmed.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;
}

impl std::fmt::Debug for dyn Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element").field("text", &self.text()).finish()
    }
}

/// The live page: DOM root, visible URL/history, and mutation notifications.
pub trait Page: Queryable + Send + Sync {
    /// The currently visible URL.
    fn url(&self) -> String;

    /// Scheme + host origin of the page, e.g. `https://www.xiaohongshu.com`.
    fn origin(&self) -> String;

    /// Rewrites the visible URL without a reload (`history.pushState`).
    fn push_url(&self, url: &str);

    /// Dispatches a synthetic navigation-changed event so the single-page
    /// app's router reacts to a rewritten URL (`popstate`).
    fn dispatch_pop_state(&self);

    /// Subscribes to DOM mutation notifications: one tick per mutation
    /// batch. Dropping the receiver is the unsubscription.
    fn mutations(&self) -> broadcast::Receiver<()>;
}
