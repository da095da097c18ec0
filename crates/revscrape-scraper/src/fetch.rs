//! The fetch collaborator contract used by [`crate::ReviewScraper`].

use std::future::Future;

use crate::error::ScraperError;

/// Something that turns a listing URL into raw HTML.
///
/// Implementations report every non-markup outcome (network failure, error
/// status, a rendering service returning no HTML) as an `Err`; the
/// orchestrator treats those as page-level fetch failures and moves on to the
/// next page number. An `Ok` body is handed to the HTML parser as-is.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}
