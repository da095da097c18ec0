//! Turns parsed arguments plus environment config into a scrape run.
//!
//! Everything that can be rejected (dates, range, company id) is checked in
//! [`build_plan`], before any request is made.

use std::path::{Path, PathBuf};
use std::time::Duration;

use revscrape_core::{
    parse_cli_date, AppConfig, ConfigError, DateRange, ReviewRecord, ScrapeTarget,
};
use revscrape_scraper::{
    FirecrawlClient, HtmlClient, PageFetcher, ReviewScraper, ScrapeOptions, ScrapeReport,
};

use crate::output::write_reviews_json;
use crate::Cli;

/// A validated run: what to scrape, how, and where to write it.
#[derive(Debug)]
pub(crate) struct ScrapePlan {
    pub target: ScrapeTarget,
    pub options: ScrapeOptions,
    pub output_dir: PathBuf,
}

/// Validates arguments against the loaded config.
///
/// # Errors
///
/// Returns [`ConfigError`] for an unparseable date, a half-specified or
/// inverted range, or a non-default company without an id.
pub(crate) fn build_plan(cli: &Cli, config: &AppConfig) -> Result<ScrapePlan, ConfigError> {
    let start = cli.start_date.as_deref().map(parse_cli_date).transpose()?;
    let end = cli.end_date.as_deref().map(parse_cli_date).transpose()?;
    let date_range = DateRange::from_bounds(start, end)?;

    let target = ScrapeTarget::new(cli.company.clone(), cli.company_id);
    let listing_url = target.listing_url(&config.base_url)?;

    let mut options = ScrapeOptions::new(listing_url);
    options.date_range = date_range;
    options.inter_page_delay =
        Duration::from_millis(cli.delay_ms.unwrap_or(config.scraper_inter_page_delay_ms));
    options.max_pages = cli.max_pages.unwrap_or(config.scraper_max_pages);
    options.max_consecutive_fetch_failures = config.scraper_max_consecutive_fetch_failures;
    options.debug_html_dir.clone_from(&config.debug_html_dir);

    Ok(ScrapePlan {
        target,
        options,
        output_dir: cli
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone()),
    })
}

/// Runs the scrape with the configured fetcher, writes the export and prints
/// a summary.
///
/// # Errors
///
/// Returns an error if a fetcher cannot be built or the export cannot be
/// written. Fetch failures during the run are not errors.
pub(crate) async fn execute(config: &AppConfig, plan: ScrapePlan) -> anyhow::Result<()> {
    let ScrapePlan {
        target,
        options,
        output_dir,
    } = plan;
    let date_range = options.date_range;

    tracing::info!(
        company = %target.company,
        listing_url = %options.listing_url,
        firecrawl = config.firecrawl_api_key.is_some(),
        "scraping reviews"
    );

    let (report, reviews) = match config.firecrawl_api_key.as_deref() {
        Some(api_key) => {
            let client = FirecrawlClient::new(
                &config.firecrawl_api_url,
                api_key,
                config.scraper_request_timeout_secs,
                config.scraper_max_retries,
                config.scraper_retry_backoff_base_secs,
            )?;
            scrape_with(client, options).await
        }
        None => {
            let client = HtmlClient::new(
                config.scraper_request_timeout_secs,
                &config.scraper_user_agent,
                config.scraper_max_retries,
                config.scraper_retry_backoff_base_secs,
            )?;
            scrape_with(client, options).await
        }
    };

    let path = write_reviews_json(&output_dir, &target.slug(), &reviews)?;

    for line in summary_lines(&report, &path, date_range.as_ref()) {
        println!("{line}");
    }
    Ok(())
}

/// Lines printed after a run. With a date range, the kept count is set
/// against every card seen, out-of-range cards included.
pub(crate) fn summary_lines(
    report: &ScrapeReport,
    path: &Path,
    date_range: Option<&DateRange>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {} reviews to {}",
        report.reviews_kept,
        path.display()
    )];
    if let Some(range) = date_range {
        lines.push(format!(
            "Kept {} of {} reviews seen for {range}",
            report.reviews_kept, report.cards_seen
        ));
    }
    lines.push(format!(
        "Stopped: {} after {} pages ({} fetch failures)",
        report.stop_reason, report.pages_visited, report.fetch_failures
    ));
    lines
}

async fn scrape_with<F: PageFetcher>(
    fetcher: F,
    options: ScrapeOptions,
) -> (ScrapeReport, Vec<ReviewRecord>) {
    let mut scraper = ReviewScraper::new(fetcher, options);
    let report = scraper.run().await;
    (report, scraper.into_reviews())
}
