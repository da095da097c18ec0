use crate::ConfigError;

/// Company scraped when none is named on the command line.
pub const DEFAULT_COMPANY: &str = "FloBooks";

/// Listing path of [`DEFAULT_COMPANY`], which is known without an id.
const DEFAULT_COMPANY_PATH: &str = "/reviews/202732/flobooks";

/// The company whose review listing is scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub company: String,
    pub company_id: Option<u64>,
}

impl Default for ScrapeTarget {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY.to_string(),
            company_id: None,
        }
    }
}

impl ScrapeTarget {
    #[must_use]
    pub fn new(company: Option<String>, company_id: Option<u64>) -> Self {
        Self {
            company: company
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
            company_id,
        }
    }

    /// Lowercased company name with whitespace runs joined by `-`, used in
    /// listing URLs and output file names.
    #[must_use]
    pub fn slug(&self) -> String {
        self.company
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Resolves the first listing page URL under `base_url`.
    ///
    /// The default company resolves to its hardcoded listing even when an id
    /// is given; any other company needs `company_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCompanyId`] for a non-default company
    /// without an id.
    pub fn listing_url(&self, base_url: &str) -> Result<String, ConfigError> {
        let base = base_url.trim_end_matches('/');
        let slug = self.slug();
        if slug == DEFAULT_COMPANY.to_lowercase() {
            return Ok(format!("{base}{DEFAULT_COMPANY_PATH}"));
        }
        match self.company_id {
            Some(id) => Ok(format!("{base}/reviews/{id}/{slug}")),
            None => Err(ConfigError::MissingCompanyId {
                company: self.company.clone(),
                default_company: DEFAULT_COMPANY,
            }),
        }
    }
}
