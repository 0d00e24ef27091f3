//! Field extraction through ordered fallback selector chains.
//!
//! No single selector is reliable against markup that shifts between render
//! paths and component-library versions, so a field is defined by an ordered
//! candidate list: the first selector whose match carries non-empty trimmed
//! text wins, and a fallback value preserves the record shape when none do.

use crate::page::Queryable;

/// Resolves a text field from `candidates`, tried in order.
///
/// A candidate is skipped when it matches nothing or when its first match
/// trims to an empty string; `fallback` is returned when every candidate is
/// skipped. Works over the whole page or scoped to one card element.
pub fn first_text<Q>(scope: &Q, candidates: &[&str], fallback: &str) -> String
where
    Q: Queryable + ?Sized,
{
    for selector in candidates {
        if let Some(element) = scope.query(selector) {
            let text = element.text().trim().to_owned();
            if !text.is_empty() {
                tracing::trace!(selector, "field resolved");
                return text;
            }
        }
    }
    fallback.to_owned()
}

/// Resolves the trimmed text of the `index`-th match of `selector`, falling
/// back when the match is missing or empty.
///
/// Used for the profile header counters, which are three identically-classed
/// elements distinguished only by document order.
pub fn nth_text<Q>(scope: &Q, selector: &str, index: usize, fallback: &str) -> String
where
    Q: Queryable + ?Sized,
{
    scope
        .query_all(selector)
        .get(index)
        .map(|element| element.text().trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, FakePage};

    #[test]
    fn returns_first_non_empty_match_in_listed_order() {
        let page = FakePage::new("https://example.com");
        page.insert(".b", FakeElement::with_text("second"));
        page.insert("#c", FakeElement::with_text("third"));

        let value = first_text(page.as_ref(), &["a", ".b", "#c"], "X");
        assert_eq!(value, "second");
    }

    #[test]
    fn skips_matches_with_blank_text() {
        let page = FakePage::new("https://example.com");
        page.insert("a", FakeElement::with_text("   \n\t"));
        page.insert(".b", FakeElement::with_text("  kept  "));

        let value = first_text(page.as_ref(), &["a", ".b"], "X");
        assert_eq!(value, "kept");
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        let page = FakePage::new("https://example.com");
        let value = first_text(page.as_ref(), &["a", ".b", "#c"], "X");
        assert_eq!(value, "X");
    }

    #[test]
    fn nth_text_indexes_in_document_order() {
        let page = FakePage::new("https://example.com");
        page.insert(".count", FakeElement::with_text("12"));
        page.insert(".count", FakeElement::with_text("3400"));
        page.insert(".count", FakeElement::with_text("1.2万"));

        assert_eq!(nth_text(page.as_ref(), ".count", 0, "0"), "12");
        assert_eq!(nth_text(page.as_ref(), ".count", 2, "0"), "1.2万");
        assert_eq!(nth_text(page.as_ref(), ".count", 3, "0"), "0");
    }
}
