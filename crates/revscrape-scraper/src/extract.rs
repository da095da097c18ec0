//! Ordered-fallback field extraction from a review card.
//!
//! Each field is described by a [`SelectorList`]: candidate CSS selectors in
//! priority order. The first selector that matches anything inside the card
//! wins, so a list can name the current markup first and older layouts after
//! it without per-field branching.
//!
//! Lists are kept as separate selectors rather than one comma-joined group,
//! since `scraper` returns group matches in document order.

use scraper::{ElementRef, Selector};

use crate::error::ScraperError;

/// Candidate selectors for one field, tried in order.
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] for the first source string
    /// that is not a valid CSS selector.
    pub fn parse(sources: &[&str]) -> Result<Self, ScraperError> {
        let selectors = sources
            .iter()
            .map(|source| {
                Selector::parse(source).map_err(|e| ScraperError::InvalidSelector {
                    selector: (*source).to_owned(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Returns the first element matched by the highest-priority selector
    /// that matches anything within `scope`.
    #[must_use]
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }
}

/// Extracts one field from `card`.
///
/// On the first structural match, returns the value of `attribute` when it
/// was requested and is present on the matched element, otherwise the
/// element's whitespace-collapsed text. Returns `None` when no selector
/// matches. A match with empty text still counts as the answer.
#[must_use]
pub fn extract_text(
    card: ElementRef<'_>,
    selectors: &SelectorList,
    attribute: Option<&str>,
) -> Option<String> {
    let element = selectors.first_match(card)?;
    if let Some(value) = attribute.and_then(|name| element.value().attr(name)) {
        return Some(collapse_whitespace(value));
    }
    Some(normalized_text(element))
}

/// [`extract_text`] collapsed to `default` when nothing matches.
#[must_use]
pub fn extract_text_or(
    card: ElementRef<'_>,
    selectors: &SelectorList,
    attribute: Option<&str>,
    default: &str,
) -> String {
    extract_text(card, selectors, attribute).unwrap_or_else(|| default.to_owned())
}

/// All descendant text of `element`, concatenated, with whitespace runs
/// collapsed to single spaces and the ends trimmed.
#[must_use]
pub fn normalized_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text held directly by `element`, excluding text inside child elements.
#[must_use]
pub fn own_text(element: ElementRef<'_>) -> String {
    let joined = element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect::<String>();
    collapse_whitespace(&joined)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
