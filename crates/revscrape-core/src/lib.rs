pub mod app_config;
pub mod config;
pub mod dates;
pub mod reviews;
pub mod target;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{parse_cli_date, parse_flexible_date};
pub use reviews::{DateRange, ReviewRecord, REVIEW_SOURCE};
pub use target::{ScrapeTarget, DEFAULT_COMPANY};

use thiserror::Error;

/// Configuration-level failures. Every variant is fatal: the caller must not
/// start a scrape run after receiving one.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("unsupported date format: '{input}'; use a format like DD/MM/YYYY")]
    InvalidDate { input: String },

    #[error("both start and end dates must be provided together")]
    IncompleteDateRange,

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("a company id must be provided for companies other than {default_company} (got '{company}')")]
    MissingCompanyId {
        company: String,
        default_company: &'static str,
    },
}
