//! Review card parsing.
//!
//! Every field is extracted independently through its own ordered selector
//! list, so a field that cannot be found falls back to its default without
//! affecting the others. Parsing a card cannot fail: a card with nothing in
//! it still yields a record made entirely of defaults.

use std::sync::LazyLock;

use regex::Regex;
use revscrape_core::{parse_flexible_date, ReviewRecord, REVIEW_SOURCE};
use scraper::{ElementRef, Html, Selector};

use crate::extract::{extract_text_or, normalized_text, own_text, SelectorList};

/// Default reviewer name when no name element matches.
pub const UNKNOWN_REVIEWER: &str = "Unknown";

static REVIEW_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.review-card").expect("valid card selector"));

static NAME_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&[
        "div.fw-600",
        ".reviewer-name",
        r#"[data-testid*="reviewer"]"#,
        "h4",
        "strong",
    ])
    .expect("valid name selectors")
});

static TITLE_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&["h3", "h2", ".review-title", r#"[data-testid*="title"]"#])
        .expect("valid title selectors")
});

static DATE_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&["time", ".review-date", "[datetime]", ".fs-5", ".text-muted"])
        .expect("valid date selectors")
});

static CONTENT_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&[
        "p",
        ".review-content",
        ".fs-4.lh-2",
        r#"[data-testid*="content"]"#,
    ])
    .expect("valid content selectors")
});

static RATING_SELECTORS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(&[
        r#"[aria-label*="star"]"#,
        r#"[class*="rating"]"#,
        r#"[class*="star"]"#,
        ".rating",
    ])
    .expect("valid rating selectors")
});

/// Elements that may carry a "Pros:" / "Cons:" section.
static PROS_CONS_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, p, ul, li").expect("valid pros/cons selector"));

static RATING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid rating regex"));

/// Returns every review card on a listing page, in document order.
#[must_use]
pub fn review_cards(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&REVIEW_CARD).collect()
}

/// Parses one review card into a record stamped with `page_number`.
///
/// Fields that cannot be found take their defaults (`"Unknown"` for the
/// reviewer, `""` for text fields, `0.0` for the rating, `None` for the
/// parsed date), so every card yields exactly one record.
#[must_use]
pub fn parse_review_card(card: ElementRef<'_>, page_number: u32) -> ReviewRecord {
    let reviewer_name = extract_text_or(card, &NAME_SELECTORS, None, UNKNOWN_REVIEWER);
    let review_title = extract_text_or(card, &TITLE_SELECTORS, None, "");
    let review_date_raw = extract_text_or(card, &DATE_SELECTORS, Some("datetime"), "");
    let parsed_date = parse_flexible_date(&review_date_raw);
    let rating = extract_rating(card);
    let content = extract_text_or(card, &CONTENT_SELECTORS, None, "");
    let (pros, cons) = extract_pros_cons(card);

    if review_date_raw.is_empty() && content.is_empty() {
        tracing::debug!(page = page_number, %reviewer_name, "review card has no date or content");
    }

    ReviewRecord {
        reviewer_name,
        review_title,
        review_date_raw,
        parsed_date,
        rating,
        content,
        pros,
        cons,
        page_number,
        source: REVIEW_SOURCE.to_owned(),
    }
}

/// Reads the rating from the first element matched by the highest-priority
/// rating selector: its text, or its `aria-label` when the text is empty.
///
/// Later selectors are not consulted even if the matched element carries no
/// number; the rating then stays `0.0`.
fn extract_rating(card: ElementRef<'_>) -> f64 {
    let Some(element) = RATING_SELECTORS.first_match(card) else {
        return 0.0;
    };
    let text = normalized_text(element);
    let source = if text.is_empty() {
        element.value().attr("aria-label").unwrap_or_default()
    } else {
        text.as_str()
    };
    parse_rating_token(source).unwrap_or(0.0)
}

/// First decimal-looking token in `text`, e.g. `4.5` from `"Rated 4.5 out of 5"`.
fn parse_rating_token(text: &str) -> Option<f64> {
    RATING_NUMBER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Finds the first element whose own text contains `pros:` and the first
/// whose own text contains `cons:` (case-insensitive) and returns their full
/// text. Missing sections are empty strings.
fn extract_pros_cons(card: ElementRef<'_>) -> (String, String) {
    let mut pros: Option<String> = None;
    let mut cons: Option<String> = None;

    for element in card.select(&PROS_CONS_CANDIDATES) {
        let marker_text = own_text(element).to_lowercase();
        if pros.is_none() && marker_text.contains("pros:") {
            pros = Some(normalized_text(element));
        } else if cons.is_none() && marker_text.contains("cons:") {
            cons = Some(normalized_text(element));
        }
        if pros.is_some() && cons.is_some() {
            break;
        }
    }

    (pros.unwrap_or_default(), cons.unwrap_or_default())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
