mod output;
mod run;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revscrape")]
#[command(about = "Export reviews from a paginated Capterra listing to JSON")]
struct Cli {
    /// Company whose reviews are scraped (defaults to FloBooks)
    #[arg(long)]
    company: Option<String>,

    /// Numeric listing id; required for any company other than the default
    #[arg(long)]
    company_id: Option<u64>,

    /// Keep reviews on or after this date (DD/MM/YYYY); requires --end-date
    #[arg(long)]
    start_date: Option<String>,

    /// Keep reviews on or before this date (DD/MM/YYYY); requires --start-date
    #[arg(long)]
    end_date: Option<String>,

    /// Directory for the JSON export (overrides REVSCRAPE_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Pause between page requests in milliseconds (overrides REVSCRAPE_INTER_PAGE_DELAY_MS)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many page attempts (overrides REVSCRAPE_MAX_PAGES)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = revscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let plan = run::build_plan(&cli, &config)?;
    run::execute(&config, plan).await
}
