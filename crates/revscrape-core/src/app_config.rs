use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub log_level: String,
    pub output_dir: PathBuf,
    pub debug_html_dir: Option<PathBuf>,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_page_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    pub scraper_max_pages: u32,
    /// `None` means failed pages are passed over without limit.
    pub scraper_max_consecutive_fetch_failures: Option<u32>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("debug_html_dir", &self.debug_html_dir)
            .field(
                "firecrawl_api_key",
                &self.firecrawl_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("firecrawl_api_url", &self.firecrawl_api_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_page_delay_ms",
                &self.scraper_inter_page_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field("scraper_max_pages", &self.scraper_max_pages)
            .field(
                "scraper_max_consecutive_fetch_failures",
                &self.scraper_max_consecutive_fetch_failures,
            )
            .finish()
    }
}
