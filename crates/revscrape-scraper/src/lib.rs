pub mod client;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pagination;
pub mod parse;
pub(crate) mod rate_limit;
pub mod scrape;

pub use client::{page_url, FirecrawlClient, HtmlClient};
pub use error::ScraperError;
pub use extract::{extract_text, extract_text_or, SelectorList};
pub use fetch::PageFetcher;
pub use pagination::has_next_page;
pub use parse::{parse_review_card, review_cards};
pub use scrape::{ReviewScraper, ScrapeOptions, ScrapeReport, StopReason};
