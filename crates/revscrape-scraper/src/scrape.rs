//! Page-by-page review collection for one listing.
//!
//! [`ReviewScraper`] walks a paginated listing sequentially: fetch, extract,
//! filter, accumulate, then ask the pagination heuristics whether to go on.
//! A page that fails to fetch is skipped and the walk continues with the next
//! page number; a page that fetches fine but holds no review cards is the end
//! of the data. The two are never confused.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use revscrape_core::{DateRange, ReviewRecord};
use scraper::Html;

use crate::client::page_url;
use crate::fetch::PageFetcher;
use crate::pagination::has_next_page;
use crate::parse::{parse_review_card, review_cards};

pub const DEFAULT_INTER_PAGE_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_PAGES: u32 = 200;

/// Settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// URL of page 1 of the listing.
    pub listing_url: String,
    /// When set, only reviews with a parsed date inside the range are kept.
    pub date_range: Option<DateRange>,
    /// Pause before every fetch except the first.
    pub inter_page_delay: Duration,
    /// Upper bound on page attempts, failed fetches included.
    pub max_pages: u32,
    /// Ends the run after this many failed fetches in a row. `None` (the
    /// default) keeps moving forward past failures until another stop
    /// condition is met.
    pub max_consecutive_fetch_failures: Option<u32>,
    /// Directory receiving `debug_page_<n>.html` for every fetched page.
    pub debug_html_dir: Option<PathBuf>,
}

impl ScrapeOptions {
    #[must_use]
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            date_range: None,
            inter_page_delay: DEFAULT_INTER_PAGE_DELAY,
            max_pages: DEFAULT_MAX_PAGES,
            max_consecutive_fetch_failures: None,
            debug_html_dir: None,
        }
    }
}

/// Why a run ended. Every variant is a normal end; collected reviews are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The pagination heuristics found no next page.
    LastPage,
    /// A page fetched successfully but contained no review cards.
    EmptyPage,
    /// A fetch succeeded with a blank body.
    NoUsableMarkup,
    PageLimit,
    TooManyFetchFailures,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LastPage => "last page reached",
            Self::EmptyPage => "page without review cards",
            Self::NoUsableMarkup => "no usable markup",
            Self::PageLimit => "page limit reached",
            Self::TooManyFetchFailures => "too many consecutive fetch failures",
        };
        f.write_str(text)
    }
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeReport {
    pub stop_reason: StopReason,
    /// Page attempts, failed fetches included.
    pub pages_visited: u32,
    pub fetch_failures: u32,
    pub cards_seen: usize,
    pub reviews_kept: usize,
}

/// Result of extracting one fetched page.
#[derive(Debug)]
struct PageScan {
    cards: usize,
    records: Vec<ReviewRecord>,
    has_next: bool,
}

/// Sequential scraper over one paginated review listing.
///
/// Owns its fetcher and the collection for the current run. `run` takes
/// `&mut self`, so a scraper cannot be driven twice concurrently, and each
/// call starts from an empty collection.
pub struct ReviewScraper<F> {
    fetcher: F,
    options: ScrapeOptions,
    reviews: Vec<ReviewRecord>,
}

impl<F: PageFetcher> ReviewScraper<F> {
    #[must_use]
    pub fn new(fetcher: F, options: ScrapeOptions) -> Self {
        Self {
            fetcher,
            options,
            reviews: Vec::new(),
        }
    }

    /// Walks the listing from page 1 until a stop condition is met.
    ///
    /// Never fails: fetch errors are logged and counted, and whatever was
    /// collected before the stop stays available through [`Self::reviews`].
    pub async fn run(&mut self) -> ScrapeReport {
        self.reviews.clear();

        let mut current_page: u32 = 1;
        let mut pages_visited: u32 = 0;
        let mut fetch_failures: u32 = 0;
        let mut consecutive_failures: u32 = 0;
        let mut cards_seen = 0usize;

        tracing::info!(
            listing_url = %self.options.listing_url,
            date_range = ?self.options.date_range.as_ref().map(ToString::to_string),
            "starting review scrape"
        );

        let stop_reason = loop {
            if pages_visited >= self.options.max_pages {
                tracing::warn!(max_pages = self.options.max_pages, "page limit reached");
                break StopReason::PageLimit;
            }

            if pages_visited > 0 && !self.options.inter_page_delay.is_zero() {
                tokio::time::sleep(self.options.inter_page_delay).await;
            }
            pages_visited += 1;

            let url = page_url(&self.options.listing_url, current_page);
            tracing::info!(page = current_page, %url, "fetching review page");

            let markup = match self.fetcher.fetch_page(&url).await {
                Ok(markup) => {
                    consecutive_failures = 0;
                    markup
                }
                Err(e) => {
                    fetch_failures += 1;
                    consecutive_failures += 1;
                    tracing::warn!(page = current_page, %url, error = %e, "page fetch failed; moving on");
                    if self
                        .options
                        .max_consecutive_fetch_failures
                        .is_some_and(|limit| consecutive_failures >= limit)
                    {
                        break StopReason::TooManyFetchFailures;
                    }
                    current_page = current_page.saturating_add(1);
                    continue;
                }
            };

            if let Some(dir) = self.options.debug_html_dir.as_deref() {
                dump_debug_page(dir, current_page, &markup);
            }

            if markup.trim().is_empty() {
                tracing::warn!(page = current_page, "fetch returned no usable markup");
                break StopReason::NoUsableMarkup;
            }

            let scan = scan_page(&markup, current_page, self.options.date_range.as_ref());
            cards_seen += scan.cards;

            if scan.cards == 0 {
                tracing::info!(page = current_page, "no review cards on page; end of listing");
                break StopReason::EmptyPage;
            }

            tracing::info!(
                page = current_page,
                cards = scan.cards,
                kept = scan.records.len(),
                "page processed"
            );
            self.reviews.extend(scan.records);

            if !scan.has_next {
                break StopReason::LastPage;
            }
            current_page = current_page.saturating_add(1);
        };

        let report = ScrapeReport {
            stop_reason,
            pages_visited,
            fetch_failures,
            cards_seen,
            reviews_kept: self.reviews.len(),
        };
        tracing::info!(
            stop_reason = %report.stop_reason,
            pages_visited = report.pages_visited,
            fetch_failures = report.fetch_failures,
            cards_seen = report.cards_seen,
            reviews_kept = report.reviews_kept,
            "review scrape finished"
        );
        report
    }

    /// Reviews collected by the most recent run, in page and card order.
    #[must_use]
    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }

    #[must_use]
    pub fn into_reviews(self) -> Vec<ReviewRecord> {
        self.reviews
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }
}

/// Parses one page and extracts everything the loop needs from it. The
/// parsed document is dropped before returning, so it never lives across an
/// await point.
fn scan_page(markup: &str, page_number: u32, date_range: Option<&DateRange>) -> PageScan {
    let document = Html::parse_document(markup);
    let cards = review_cards(&document);
    let card_count = cards.len();

    let records: Vec<ReviewRecord> = cards
        .into_iter()
        .map(|card| parse_review_card(card, page_number))
        .filter(|record| date_range.is_none_or(|range| range.admits(record.parsed_date)))
        .collect();

    let has_next = card_count > 0 && has_next_page(&document, page_number);

    PageScan {
        cards: card_count,
        records,
        has_next,
    }
}

fn dump_debug_page(dir: &Path, page_number: u32, markup: &str) {
    let path = dir.join(format!("debug_page_{page_number}.html"));
    let result = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, markup));
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "wrote debug page"),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to write debug page");
        }
    }
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
