//! Record types for one scraped author: profile stats, note details, and the
//! assembled record handed to persistence and cloud sync.
//!
//! All counts are kept as the raw display strings the page renders
//! (`"1.2万"`, `"999+"`); nothing here parses them into numbers. Serde names
//! are camelCase to stay byte-compatible with the JSON payload the original
//! browser extension emitted, which downstream n8n workflows already consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel strings substituted when genuine data is unobtainable.
///
/// These are data, not diagnostics: they travel in the synced JSON payload,
/// so they keep the exact values downstream consumers were built against.
pub mod sentinel {
    /// `desc` for a note slot whose whole fetch failed.
    pub const FETCH_FAILED: &str = "获取失败";

    /// Default `desc` when the detail view renders no description.
    pub const NO_DESC: &str = "无描述内容";

    /// `desc` when no detail link could be recovered from the card.
    pub const LINK_UNAVAILABLE: &str = "无法获取笔记链接";
}

/// Strips a display user id down to ASCII alphanumerics.
///
/// The page renders ids as `"小红书号：12345abc"`; only the trailing
/// alphanumeric run is meaningful to downstream consumers.
#[must_use]
pub fn clean_user_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Profile-level stats scraped from the author page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub user_name: String,
    /// Sanitized via [`clean_user_id`].
    pub user_id: String,
    pub subscribers: String,
    pub followers: String,
    pub likes: String,
}

/// Fields extracted from one note's detail view.
///
/// Never carries absent data: every field is a real value, a card-level
/// fallback, or a [`sentinel`] string, so the record shape is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDetail {
    pub title: String,
    pub desc: String,
    pub like: String,
    pub collect: String,
}

impl NoteDetail {
    /// The slot recorded when one note's fetch fails outright; the batch
    /// continues and the list keeps its length.
    #[must_use]
    pub fn failure_sentinel() -> Self {
        Self {
            title: String::new(),
            desc: sentinel::FETCH_FAILED.to_owned(),
            like: "0".to_owned(),
            collect: "0".to_owned(),
        }
    }
}

/// Card-level title and like count, kept as the fallback source when the
/// detail view cannot be reached or yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFallback {
    pub title: String,
    pub like: String,
}

/// The aggregate record for one scrape invocation.
///
/// Assembled exactly once by the orchestrator and never mutated afterwards;
/// persistence and sync only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: AuthorProfile,
    /// Every note tile's title, full list, document order.
    pub all_titles: Vec<String>,
    /// Details for the first `min(10, card count)` notes, card order.
    #[serde(rename = "top10Notes")]
    pub top_notes: Vec<NoteDetail>,
    pub profile_url: String,
    pub created_at: DateTime<Utc>,
}

impl AuthorRecord {
    /// Builds the record from the scraped pieces, generating its id and
    /// creation timestamp.
    #[must_use]
    pub fn assemble(
        profile: AuthorProfile,
        all_titles: Vec<String>,
        top_notes: Vec<NoteDetail>,
        profile_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            all_titles,
            top_notes,
            profile_url: profile_url.into(),
            created_at: Utc::now(),
        }
    }
}
