//! Selector inventory for the profile page and the note detail view.
//!
//! The target markup varies across render paths and component-library
//! versions, so most fields carry an ordered candidate list rather than a
//! single selector; extraction degrades down the list and finally to a
//! fallback value. Observed variants come from live profile and detail
//! pages, desktop web rendering.

/// Profile header element whose presence means the profile has rendered.
pub const PROFILE_MARKER: &str = ".user-name";

pub const USER_NAME: &str = ".user-name";
pub const USER_RED_ID: &str = ".user-redId";

/// The three header counters, document order: subscribers, followers, likes.
pub const USER_INTERACTION_COUNTS: &str = ".user-interactions .count";

/// Every note tile's title in the posted feed, document order.
pub const FEED_TITLES: &str = "#userPostedFeeds .footer .title";

/// The note summary cards themselves.
pub const NOTE_CARDS: &str = "#userPostedFeeds .note-item";

// Card-level fallback fields.
pub const CARD_TITLE: &str = ".footer .title";
pub const CARD_LIKE_COUNT: &str = ".like-wrapper .count";

// Anchors used to recover a detail URL from a card. The base path and the
// auth query tokens live on different anchors.
pub const EXPLORE_ANCHOR: &str = r#"a[href^="/explore/"]"#;
pub const COVER_ANCHOR: &str = "a.cover";
pub const ANY_EXPLORE_ANCHOR: &str = r#"a[href*="explore"]"#;

/// Selector group: any one of these marks the detail view as loaded.
pub const DETAIL_MARKERS: &str = "#detail-title, .note-content, .interaction-container";

pub const DETAIL_TITLE: &[&str] = &["#detail-title", ".note-title", r#"[class*="title"]"#];

pub const DETAIL_DESC: &[&str] = &[
    "#detail-desc.desc",
    ".note-content .desc",
    ".note-desc",
    ".content .desc",
    r#"[class*="desc"]:not(.note-title)"#,
    ".note-content",
];

pub const DETAIL_LIKE: &[&str] = &[
    ".interaction-container .like-wrapper .count",
    ".like-wrapper .count",
    ".interaction .like .count",
    r#"[class*="like"] .count"#,
    r#"[class*="like"][class*="count"]"#,
];

pub const DETAIL_COLLECT: &[&str] = &[
    ".interaction-container .collect-wrapper .count",
    ".collect-wrapper .count",
    ".interaction .collect .count",
    r#"[class*="collect"] .count"#,
    r#"[class*="collect"][class*="count"]"#,
];
