use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// config pointed at the public Capterra site with direct HTTP fetching.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("REVSCRAPE_BASE_URL", "https://www.capterra.in")
        .trim_end_matches('/')
        .to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVSCRAPE_BASE_URL".to_string(),
            reason: format!("'{base_url}' is not an http(s) URL"),
        });
    }

    let log_level = or_default("REVSCRAPE_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("REVSCRAPE_OUTPUT_DIR", "."));
    let debug_html_dir = optional("REVSCRAPE_DEBUG_HTML_DIR").map(PathBuf::from);

    let firecrawl_api_key = optional("FIRECRAWL_API_KEY");
    let firecrawl_api_url = or_default("FIRECRAWL_API_URL", "https://api.firecrawl.dev")
        .trim_end_matches('/')
        .to_string();

    let scraper_request_timeout_secs = parse_u64("REVSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("REVSCRAPE_USER_AGENT", "revscrape/0.1 (review-export)");
    let scraper_inter_page_delay_ms = parse_u64("REVSCRAPE_INTER_PAGE_DELAY_MS", "2000")?;
    let scraper_max_retries = parse_u32("REVSCRAPE_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs = parse_u64("REVSCRAPE_RETRY_BACKOFF_BASE_SECS", "5")?;
    let scraper_max_pages = parse_u32("REVSCRAPE_MAX_PAGES", "200")?;
    let scraper_max_consecutive_fetch_failures = optional(
        "REVSCRAPE_MAX_CONSECUTIVE_FETCH_FAILURES",
    )
    .map(|raw| match raw.parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar {
            var: "REVSCRAPE_MAX_CONSECUTIVE_FETCH_FAILURES".to_string(),
            reason: "must be at least 1; leave unset for no limit".to_string(),
        }),
        Ok(limit) => Ok(limit),
        Err(e) => Err(ConfigError::InvalidEnvVar {
            var: "REVSCRAPE_MAX_CONSECUTIVE_FETCH_FAILURES".to_string(),
            reason: e.to_string(),
        }),
    })
    .transpose()?;

    if scraper_max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVSCRAPE_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        base_url,
        log_level,
        output_dir,
        debug_html_dir,
        firecrawl_api_key,
        firecrawl_api_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_page_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_max_pages,
        scraper_max_consecutive_fetch_failures,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
