//! Integration tests for the HTTP page fetchers and a full scrape run.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Listing bodies are served as `text/html`; the
//! direct client rejects anything that is not markup.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use revscrape_scraper::{
    FirecrawlClient, HtmlClient, ReviewScraper, ScrapeOptions, ScraperError, StopReason,
};

const LISTING_PATH: &str = "/reviews/202732/flobooks";

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> HtmlClient {
    HtmlClient::new(5, "revscrape-test/0.1", 0, 0).expect("failed to build test HtmlClient")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

fn listing_page(names: &[&str], next_page: Option<u32>) -> String {
    let cards: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<div class="review-card"><div class="fw-600">{name}</div><span class="fs-5">15 January, 2023</span><p>Review by {name}</p></div>"#
            )
        })
        .collect();
    let pager = match next_page {
        Some(n) => format!(
            r#"<nav aria-label="Pagination"><a aria-label="Next Page" href="{LISTING_PATH}?page={n}">›</a></nav>"#
        ),
        None => r#"<nav aria-label="Pagination"><a aria-label="Next Page" aria-disabled="true">›</a></nav>"#
            .to_owned(),
    };
    format!("<!DOCTYPE html><html><body>{cards}{pager}</body></html>")
}

/// Page 1 is the bare listing path; it gets a lower priority so the
/// `?page=N` mocks win for later pages.
async fn mount_first_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html(body))
        .with_priority(10)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn fast_options(server: &MockServer) -> ScrapeOptions {
    let mut options = ScrapeOptions::new(format!("{}{LISTING_PATH}", server.uri()));
    options.inter_page_delay = Duration::ZERO;
    options
}

// ---------------------------------------------------------------------------
// HtmlClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn html_client_returns_body_of_html_response() {
    let server = MockServer::start().await;
    let body = listing_page(&["Asha"], None);
    mount_first_page(&server, &body).await;

    let result = test_client()
        .fetch_html(&format!("{}{LISTING_PATH}", server.uri()))
        .await;

    assert_eq!(result.expect("expected Ok"), body);
}

#[tokio::test]
async fn html_client_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_html(&format!("{}/reviews/1/missing", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::NotFound { ref url } if url.ends_with("/reviews/1/missing")),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn html_client_maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_html(&format!("{}{LISTING_PATH}", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            ScraperError::RateLimited {
                retry_after_secs: 7,
                ..
            }
        ),
        "expected RateLimited, got: {err:?}"
    );
}

#[tokio::test]
async fn html_client_rejects_non_html_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reviews": []})))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_html(&format!("{}{LISTING_PATH}", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::UnexpectedResponse { .. }),
        "expected UnexpectedResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn html_client_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let body = listing_page(&["Retry"], None);
    mount_first_page(&server, &body).await;

    let client = HtmlClient::new(5, "revscrape-test/0.1", 1, 0).unwrap();
    let result = client
        .fetch_html(&format!("{}{LISTING_PATH}", server.uri()))
        .await;

    assert_eq!(result.expect("expected Ok after retry"), body);
}

#[tokio::test]
async fn html_client_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = HtmlClient::new(5, "revscrape-test/0.1", 3, 0).unwrap();
    let err = client
        .fetch_html(&format!("{}{LISTING_PATH}", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }),
        "expected UnexpectedStatus 403, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// FirecrawlClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn firecrawl_client_returns_rendered_html() {
    let server = MockServer::start().await;
    let target = "https://www.capterra.in/reviews/202732/flobooks";
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(bearer_token("fc-test"))
        .and(body_json(json!({"url": target, "formats": ["html"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"html": "<div class=\"review-card\">ok</div>"}
        })))
        .mount(&server)
        .await;

    let client = FirecrawlClient::new(&server.uri(), "fc-test", 5, 0, 0).unwrap();
    let html = client.scrape_html(target).await.expect("expected Ok");

    assert_eq!(html, "<div class=\"review-card\">ok</div>");
}

#[tokio::test]
async fn firecrawl_client_reports_unsuccessful_scrape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Insufficient credits"
        })))
        .mount(&server)
        .await;

    let client = FirecrawlClient::new(&server.uri(), "fc-test", 5, 0, 0).unwrap();
    let err = client.scrape_html("https://x.test/reviews").await.unwrap_err();

    assert!(
        matches!(err, ScraperError::UnexpectedResponse { ref reason, .. } if reason == "Insufficient credits"),
        "expected UnexpectedResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn firecrawl_client_maps_malformed_body_to_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = FirecrawlClient::new(&server.uri(), "fc-test", 5, 0, 0).unwrap();
    let err = client.scrape_html("https://x.test/reviews").await.unwrap_err();

    assert!(
        matches!(err, ScraperError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// ReviewScraper over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_follows_pagination_until_disabled_next_control() {
    let server = MockServer::start().await;
    mount_first_page(&server, &listing_page(&["A", "B"], Some(2))).await;
    mount_page(&server, 2, html(&listing_page(&["C"], None))).await;

    let mut scraper = ReviewScraper::new(test_client(), fast_options(&server));
    let report = scraper.run().await;

    assert_eq!(report.stop_reason, StopReason::LastPage);
    assert_eq!(report.pages_visited, 2);
    let names: Vec<&str> = scraper
        .reviews()
        .iter()
        .map(|r| r.reviewer_name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(scraper.reviews().iter().all(|r| r.source == "Capterra"));
}

#[tokio::test]
async fn scrape_skips_failed_page_and_continues() {
    let server = MockServer::start().await;
    mount_first_page(&server, &listing_page(&["First"], Some(2))).await;
    mount_page(&server, 2, ResponseTemplate::new(500)).await;
    mount_page(&server, 3, html(&listing_page(&["Third"], None))).await;

    let mut scraper = ReviewScraper::new(test_client(), fast_options(&server));
    let report = scraper.run().await;

    assert_eq!(report.stop_reason, StopReason::LastPage);
    assert_eq!(report.fetch_failures, 1);
    let pages: Vec<u32> = scraper.reviews().iter().map(|r| r.page_number).collect();
    assert_eq!(pages, vec![1, 3]);
}

#[tokio::test]
async fn scrape_stops_at_page_without_cards() {
    let server = MockServer::start().await;
    mount_first_page(&server, &listing_page(&["Only"], Some(2))).await;
    mount_page(&server, 2, html(&listing_page(&[], Some(3)))).await;
    mount_page(&server, 3, html(&listing_page(&["Unreached"], None))).await;

    let mut scraper = ReviewScraper::new(test_client(), fast_options(&server));
    let report = scraper.run().await;

    assert_eq!(report.stop_reason, StopReason::EmptyPage);
    assert_eq!(scraper.into_reviews().len(), 1);
}
