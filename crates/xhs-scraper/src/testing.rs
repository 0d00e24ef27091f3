//! In-memory doubles for the host page and the collaborator ports.
//!
//! [`FakePage`] and [`FakeElement`] map exact selector strings to elements —
//! no CSS engine, the production code only ever uses the fixed selectors in
//! [`crate::selectors`]. The page records every navigation action so tests
//! can assert the enter/restore discipline, and exposes its mutation
//! subscriber count so waiter tests can prove no subscription leaked.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use xhs_core::{AuthorRecord, CardFallback, NoteDetail};

use crate::detail::DetailFetcher;
use crate::error::ScrapeError;
use crate::page::{Element, ElementRef, Page, Queryable};
use crate::ports::{AuthorStore, EventSink, ScrapeEvent, SyncOutcome};

type SelectorMap = HashMap<String, Vec<ElementRef>>;

/// One fake DOM element: fixed text, attributes, and selector-keyed children.
pub struct FakeElement {
    text: String,
    attrs: Mutex<HashMap<String, String>>,
    children: Mutex<SelectorMap>,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_owned(),
            attrs: Mutex::new(HashMap::new()),
            children: Mutex::new(HashMap::new()),
        })
    }

    /// An anchor element carrying an `href` attribute.
    pub fn anchor(href: &str) -> Arc<Self> {
        let element = Self::with_text("");
        element.set_attr("href", href);
        element
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.attrs
            .lock()
            .expect("attrs lock")
            .insert(name.to_owned(), value.to_owned());
    }

    /// Registers `child` under the exact selector string `selector`.
    pub fn insert(&self, selector: &str, child: ElementRef) {
        self.children
            .lock()
            .expect("children lock")
            .entry(selector.to_owned())
            .or_default()
            .push(child);
    }
}

impl Queryable for FakeElement {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.children
            .lock()
            .expect("children lock")
            .get(selector)
            .and_then(|matches| matches.first().cloned())
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        self.children
            .lock()
            .expect("children lock")
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }
}

impl Element for FakeElement {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.lock().expect("attrs lock").get(name).cloned()
    }
}

/// What the page was asked to do to its navigation state, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    PushUrl(String),
    PopState,
}

/// Fake live page: selector-keyed DOM, mutable URL, navigation log, and a
/// broadcast channel standing in for mutation observation.
pub struct FakePage {
    dom: Mutex<SelectorMap>,
    url: Mutex<String>,
    origin: String,
    nav_log: Mutex<Vec<NavAction>>,
    mutations: broadcast::Sender<()>,
}

impl FakePage {
    pub fn new(url: &str) -> Arc<Self> {
        let origin = reqwest::Url::parse(url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_default();
        let (mutations, _) = broadcast::channel(16);
        Arc::new(Self {
            dom: Mutex::new(HashMap::new()),
            url: Mutex::new(url.to_owned()),
            origin,
            nav_log: Mutex::new(Vec::new()),
            mutations,
        })
    }

    /// Adds `element` under `selector` and fires a mutation tick.
    pub fn insert(&self, selector: &str, element: ElementRef) {
        self.dom
            .lock()
            .expect("dom lock")
            .entry(selector.to_owned())
            .or_default()
            .push(element);
        self.notify_mutation();
    }

    /// Inserts after `delay` on a spawned task; pairs with paused-clock tests.
    pub fn insert_later(self: &Arc<Self>, selector: &str, element: ElementRef, delay: Duration) {
        let page = Arc::clone(self);
        let selector = selector.to_owned();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            page.insert(&selector, element);
        });
    }

    pub fn notify_mutation(&self) {
        // No receivers is fine; waits that already resolved are gone.
        let _ = self.mutations.send(());
    }

    pub fn mutation_subscriber_count(&self) -> usize {
        self.mutations.receiver_count()
    }

    pub fn nav_log(&self) -> Vec<NavAction> {
        self.nav_log.lock().expect("nav log lock").clone()
    }
}

impl Queryable for FakePage {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.dom
            .lock()
            .expect("dom lock")
            .get(selector)
            .and_then(|matches| matches.first().cloned())
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        self.dom
            .lock()
            .expect("dom lock")
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }
}

impl Page for FakePage {
    fn url(&self) -> String {
        self.url.lock().expect("url lock").clone()
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn push_url(&self, url: &str) {
        *self.url.lock().expect("url lock") = url.to_owned();
        self.nav_log
            .lock()
            .expect("nav log lock")
            .push(NavAction::PushUrl(url.to_owned()));
    }

    fn dispatch_pop_state(&self) {
        self.nav_log
            .lock()
            .expect("nav log lock")
            .push(NavAction::PopState);
    }

    fn mutations(&self) -> broadcast::Receiver<()> {
        self.mutations.subscribe()
    }
}

/// [`DetailFetcher`] double that echoes the card fallback back as the detail
/// and can be told to fail at specific call indices.
pub struct StubFetcher {
    fail_at: Mutex<HashSet<usize>>,
    calls: Mutex<Vec<(String, CardFallback)>>,
}

impl StubFetcher {
    pub fn echoing() -> Arc<Self> {
        Arc::new(Self {
            fail_at: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn failing_at(self: Arc<Self>, index: usize) -> Arc<Self> {
        self.fail_at.lock().expect("fail_at lock").insert(index);
        self
    }

    /// Every `(url, fallback)` pair seen, in call order.
    pub fn calls(&self) -> Vec<(String, CardFallback)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl DetailFetcher for StubFetcher {
    async fn fetch_detail(
        &self,
        url: &str,
        fallback: &CardFallback,
    ) -> Result<NoteDetail, ScrapeError> {
        let index = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push((url.to_owned(), fallback.clone()));
            calls.len() - 1
        };
        if self.fail_at.lock().expect("fail_at lock").contains(&index) {
            return Err(ScrapeError::DetailFetch {
                url: url.to_owned(),
                reason: "stubbed failure".to_owned(),
            });
        }
        Ok(NoteDetail {
            title: fallback.title.clone(),
            desc: "stub".to_owned(),
            like: fallback.like.clone(),
            collect: "0".to_owned(),
        })
    }
}

/// [`AuthorStore`] double keeping records in memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AuthorRecord>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<AuthorRecord> {
        self.records.lock().expect("records lock").clone()
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn append(&self, record: &AuthorRecord) -> Result<(), ScrapeError> {
        let mut records = self.records.lock().expect("records lock");
        if !records.iter().any(|existing| existing.id == record.id) {
            records.push(record.clone());
        }
        Ok(())
    }
}

/// [`AuthorStore`] double whose every append fails.
pub struct FailingStore;

#[async_trait]
impl AuthorStore for FailingStore {
    async fn append(&self, _record: &AuthorRecord) -> Result<(), ScrapeError> {
        Err(ScrapeError::StoreIo {
            path: "failing-store".to_owned(),
            source: std::io::Error::other("injected store failure"),
        })
    }
}

/// [`EventSink`] double recording every emitted event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn data_ready(&self, record: &AuthorRecord, sync: &SyncOutcome) {
        self.events
            .lock()
            .expect("events lock")
            .push(ScrapeEvent::DataReady {
                record: record.clone(),
                sync: sync.clone(),
            });
    }

    async fn data_failed(&self, error: &str) {
        self.events
            .lock()
            .expect("events lock")
            .push(ScrapeEvent::DataFailed {
                error: error.to_owned(),
            });
    }
}
