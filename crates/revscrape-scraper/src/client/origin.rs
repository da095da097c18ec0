//! URL helpers shared by the page fetchers.

/// Extracts the hostname from a page URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Returns `listing_url` with `page=<page>` appended to its query string.
///
/// Page 1 is always the bare listing URL; the site treats `?page=1` as a
/// duplicate of it.
#[must_use]
pub fn page_url(listing_url: &str, page: u32) -> String {
    if page <= 1 {
        return listing_url.to_owned();
    }
    let separator = if listing_url.contains('?') { '&' } else { '?' };
    format!("{listing_url}{separator}page={page}")
}
