//! Detail-URL recovery from a note summary card.
//!
//! The two pieces a detail URL needs — the `/explore/<id>` base path and the
//! `xsec_*` auth query tokens — live on different anchors inside the card,
//! and which anchors exist depends on the render path. Recovery is an
//! ordered chain of pure strategies over the card snapshot; adding a tier
//! means adding a function to [`STRATEGIES`], nothing else changes.

use reqwest::Url;

use crate::page::Element;
use crate::selectors;

/// What one strategy concluded about the card.
enum Resolution {
    /// A usable detail URL.
    Resolved(String),
    /// The strategy's markup shape is present but the link cannot be
    /// completed; later tiers must not second-guess it.
    Unavailable,
    /// The strategy's markup shape is absent; try the next tier.
    NotApplicable,
}

type Strategy = fn(&dyn Element, &str) -> Resolution;

/// Tiers in strict priority order; the first applicable one decides.
const STRATEGIES: &[Strategy] = &[explore_anchor_pair, any_explore_anchor];

/// Recovers the note detail URL from `card`, or `""` when no link is
/// available — the caller's signal to skip navigation and fall back to
/// card-level fields.
pub fn resolve_detail_url(card: &dyn Element, origin: &str) -> String {
    for strategy in STRATEGIES {
        match strategy(card, origin) {
            Resolution::Resolved(url) => {
                tracing::debug!(url, "resolved note detail url");
                return url;
            }
            Resolution::Unavailable => return String::new(),
            Resolution::NotApplicable => {}
        }
    }
    tracing::debug!("note card carries no usable anchors");
    String::new()
}

/// Tier 1: a hidden `/explore/` anchor provides the base path and the cover
/// anchor carries the auth tokens; compose `origin + path + ?tokens`.
fn explore_anchor_pair(card: &dyn Element, origin: &str) -> Resolution {
    let Some(base_anchor) = card.query(selectors::EXPLORE_ANCHOR) else {
        return Resolution::NotApplicable;
    };
    let base_path = base_anchor.attr("href").unwrap_or_default();

    let Some(cover) = card.query(selectors::COVER_ANCHOR) else {
        tracing::debug!(base_path, "explore anchor present but no cover anchor for tokens");
        return Resolution::Unavailable;
    };
    let cover_href = cover.attr("href").unwrap_or_default();

    match compose_with_tokens(origin, &base_path, &cover_href) {
        Some(url) => Resolution::Resolved(url),
        None => Resolution::Unavailable,
    }
}

fn compose_with_tokens(origin: &str, base_path: &str, cover_href: &str) -> Option<String> {
    let base = Url::parse(origin).ok()?;
    let cover = base.join(cover_href).ok()?;
    let mut detail = base.join(base_path).ok()?;

    let token = query_param(&cover, "xsec_token");
    let source = query_param(&cover, "xsec_source");
    if token.is_some() || source.is_some() {
        let mut pairs = detail.query_pairs_mut();
        if let Some(value) = &token {
            pairs.append_pair("xsec_token", value);
        }
        if let Some(value) = &source {
            pairs.append_pair("xsec_source", value);
        }
    }

    Some(detail.to_string())
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Tier 2: no hidden explore anchor; take the first anchor whose href
/// mentions `explore`, as-is when absolute, origin-prefixed when relative.
fn any_explore_anchor(card: &dyn Element, origin: &str) -> Resolution {
    let anchors = card.query_all(selectors::ANY_EXPLORE_ANCHOR);
    let Some(first) = anchors.first() else {
        return Resolution::NotApplicable;
    };
    let href = first.attr("href").unwrap_or_default();
    if href.is_empty() {
        return Resolution::Unavailable;
    }
    if href.starts_with("http") {
        Resolution::Resolved(href)
    } else {
        Resolution::Resolved(format!("{origin}{href}"))
    }
}
