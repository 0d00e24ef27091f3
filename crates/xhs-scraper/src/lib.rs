//! Scraping orchestrator for Xiaohongshu author profile pages.
//!
//! Works against an already-loaded profile page through the narrow host
//! traits in [`page`] — DOM queries, URL/history rewrites, a synthetic
//! navigation event, and mutation notifications. The orchestrator simulates
//! in-app navigation into each note's detail view, extracts fields through
//! ordered fallback selector chains, paces itself with jittered delays, and
//! isolates per-note failures so one bad note never aborts the batch.
//!
//! Everything around the scrape — persistence, cloud sync, outbound event
//! reporting — is a collaborator behind the async traits in [`ports`], with
//! file/HTTP/channel implementations in [`store`], [`sync`], and [`ports`].

pub mod batch;
pub mod detail;
pub mod error;
pub mod fields;
pub mod link;
pub mod nav;
pub mod page;
pub mod ports;
pub mod profile;
pub mod selectors;
pub mod store;
pub mod sync;
pub mod testing;
pub mod waiter;

pub use batch::BatchProcessor;
pub use detail::{DetailFetcher, NoteDetailFetcher};
pub use error::ScrapeError;
pub use link::resolve_detail_url;
pub use nav::{DetailViewGuard, NavigationSimulator};
pub use page::{Element, ElementRef, Page, PageRef, Queryable};
pub use ports::{AuthorStore, ChannelSink, Command, EventSink, ScrapeEvent, SyncOutcome, SyncSink};
pub use profile::ProfileScraper;
pub use store::JsonFileStore;
pub use sync::{DisabledSync, HttpSync};
pub use waiter::wait_for;
