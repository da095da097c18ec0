//! End-of-pagination detection for review listings.
//!
//! Listing markup is not stable, so the decision is made by a chain of
//! independent heuristics evaluated in priority order. Each heuristic returns
//! `Some(true)` (a next page exists), `Some(false)` (authoritatively no next
//! page) or `None` (no opinion); the first `Some` wins.
//!
//! ## Heuristics
//!
//! 1. **Pagination landmark.** A `<nav aria-label="Pagination">` containing a
//!    next control. Enabled means `true`. Disabled means `false`, and that
//!    answer suppresses the laxer heuristics below:
//!    ```text
//!    <nav aria-label="Pagination">
//!      <a aria-label="Next Page" aria-disabled="true">Next</a>
//!    </nav>
//!    ```
//! 2. **Next link text.** Any `<a>` whose text contains "next".
//! 3. **Page-number link.** Any `<a href="...page=N">` with `N` equal to the
//!    current page plus one.
//!
//! New heuristics are appended to [`HEURISTICS`] without reordering the
//! existing ones.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extract::{normalized_text, SelectorList};

type Heuristic = fn(&Html, u32) -> Option<bool>;

/// Heuristics in priority order, with names for diagnostics.
const HEURISTICS: [(&str, Heuristic); 3] = [
    ("pagination_landmark", landmark_next_control),
    ("next_link_text", next_link_text),
    ("page_number_link", page_number_link),
];

static PAGINATION_LANDMARK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"nav[aria-label="pagination" i]"#).expect("valid landmark selector")
});

static NEXT_CONTROL_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&[
        r#"a[aria-label="next page" i]"#,
        r#"a[rel~="next"]"#,
        r#"[aria-label*="next" i]"#,
    ])
    .expect("valid next control selectors")
});

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid anchor selector"));

static ANCHOR_WITH_HREF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid href selector"));

static PAGE_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page=(\d+)").expect("valid page param regex"));

/// Returns whether the listing has a page after `current_page`.
#[must_use]
pub fn has_next_page(page: &Html, current_page: u32) -> bool {
    for (name, heuristic) in HEURISTICS {
        if let Some(decision) = heuristic(page, current_page) {
            tracing::debug!(heuristic = name, decision, current_page, "pagination decided");
            return decision;
        }
    }
    tracing::debug!(current_page, "no pagination signal found");
    false
}

fn landmark_next_control(page: &Html, _current_page: u32) -> Option<bool> {
    let landmark = page.select(&PAGINATION_LANDMARK).next()?;
    let next = NEXT_CONTROL_SELECTORS.first_match(landmark)?;
    Some(!is_disabled(next))
}

fn next_link_text(page: &Html, _current_page: u32) -> Option<bool> {
    page.select(&ANCHOR)
        .any(|a| normalized_text(a).to_lowercase().contains("next"))
        .then_some(true)
}

fn page_number_link(page: &Html, current_page: u32) -> Option<bool> {
    let wanted = current_page.checked_add(1)?;
    page.select(&ANCHOR_WITH_HREF)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| PAGE_PARAM_RE.captures(href))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .any(|n| n == wanted)
        .then_some(true)
}

/// A control is disabled when it says so itself (`aria-disabled="true"`, a
/// `disabled` attribute or class) or sits in a `disabled` list item, as
/// Bootstrap-style pagers render it.
fn is_disabled(control: ElementRef<'_>) -> bool {
    let element = control.value();
    let aria_disabled = element
        .attr("aria-disabled")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    if aria_disabled || element.attr("disabled").is_some() || has_disabled_class(control) {
        return true;
    }
    control
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(has_disabled_class)
}

fn has_disabled_class(element: ElementRef<'_>) -> bool {
    element
        .value()
        .classes()
        .any(|class| class.eq_ignore_ascii_case("disabled"))
}
