//! Fetcher backed by the Firecrawl scrape API, for listings that only render
//! their review cards with JavaScript.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::origin::extract_domain;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::rate_limit::retry_with_backoff;

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    html: Option<String>,
}

/// Fetches rendered HTML through Firecrawl's `POST /v1/scrape` endpoint.
pub struct FirecrawlClient {
    client: Client,
    api_url: String,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl FirecrawlClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_url: &str,
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/scrape", self.api_url)
    }

    /// Asks Firecrawl to render `url` and returns the resulting HTML.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — Firecrawl answered 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Deserialize`] — the API body is not the expected JSON.
    /// - [`ScraperError::UnexpectedResponse`] — `success: false` or no HTML in `data`.
    /// - [`ScraperError::Http`] — network or TLS failure after all retries.
    pub async fn scrape_html(&self, url: &str) -> Result<String, ScraperError> {
        let endpoint = self.endpoint();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let endpoint = endpoint.clone();
            async move {
                let response = self
                    .client
                    .post(&endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&ScrapeRequest {
                        url,
                        formats: ["html"],
                    })
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
                        domain: extract_domain(&endpoint),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: endpoint,
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ScrapeResponse>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("firecrawl scrape of {url}"),
                        source: e,
                    }
                })?;

                extract_html(parsed, url)
            }
        })
        .await
    }
}

fn extract_html(response: ScrapeResponse, url: &str) -> Result<String, ScraperError> {
    if !response.success {
        return Err(ScraperError::UnexpectedResponse {
            url: url.to_owned(),
            reason: response
                .error
                .unwrap_or_else(|| "firecrawl reported failure".to_owned()),
        });
    }
    response
        .data
        .and_then(|d| d.html)
        .ok_or_else(|| ScraperError::UnexpectedResponse {
            url: url.to_owned(),
            reason: "firecrawl response has no html".to_owned(),
        })
}

impl PageFetcher for FirecrawlClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.scrape_html(url).await
    }
}
