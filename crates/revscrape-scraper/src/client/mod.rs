//! HTTP page fetchers for review listings.

mod firecrawl;
mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::rate_limit::retry_with_backoff;

pub use firecrawl::FirecrawlClient;
pub use origin::{extract_domain, page_url};

/// Direct HTTP fetcher for server-rendered listing pages.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, 5xx, network failures) are retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct HtmlClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl HtmlClient {
    /// Creates an `HtmlClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first failure for
    /// retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one listing page, with automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status (5xx retried, 4xx not).
    /// - [`ScraperError::UnexpectedResponse`] — the body is not HTML (not retried).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries exhausted.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_ascii_lowercase);
                if let Some(content_type) = content_type {
                    if !is_markup_content_type(&content_type) {
                        return Err(ScraperError::UnexpectedResponse {
                            url,
                            reason: format!("content type {content_type} is not HTML"),
                        });
                    }
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

impl PageFetcher for HtmlClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.fetch_html(url).await
    }
}

fn is_markup_content_type(content_type: &str) -> bool {
    content_type.contains("html") || content_type.contains("xml")
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
