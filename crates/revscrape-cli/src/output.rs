//! JSON export of collected reviews.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use revscrape_core::ReviewRecord;

/// `capterra_reviews_<slug>.json`
pub(crate) fn output_file_name(company_slug: &str) -> String {
    format!("capterra_reviews_{company_slug}.json")
}

/// Writes `reviews` as a pretty-printed JSON array into `dir`, creating the
/// directory if needed, and returns the file path. An empty run still
/// produces a file containing `[]`.
pub(crate) fn write_reviews_json(
    dir: &Path,
    company_slug: &str,
    reviews: &[ReviewRecord],
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let path = dir.join(output_file_name(company_slug));
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reviews)
        .with_context(|| format!("failed to serialize reviews to {}", path.display()))?;
    writer.flush()?;

    tracing::info!(path = %path.display(), count = reviews.len(), "wrote review export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("revscrape-output-{name}-{}", std::process::id()))
    }

    fn record(name: &str) -> ReviewRecord {
        ReviewRecord {
            reviewer_name: name.to_owned(),
            review_title: "Great for GST".to_owned(),
            review_date_raw: "15 January, 2023".to_owned(),
            parsed_date: NaiveDate::from_ymd_opt(2023, 1, 15),
            rating: 4.5,
            content: "Invoices take seconds. ₹ symbols render fine.".to_owned(),
            pros: "Pros: fast".to_owned(),
            cons: String::new(),
            page_number: 1,
            source: "Capterra".to_owned(),
        }
    }

    #[test]
    fn file_name_uses_company_slug() {
        assert_eq!(output_file_name("flobooks"), "capterra_reviews_flobooks.json");
    }

    #[test]
    fn writes_pretty_json_array_with_utf8_preserved() {
        let dir = scratch_dir("pretty");
        let path = write_reviews_json(&dir, "flobooks", &[record("Meera")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n"), "expected pretty output, got: {text}");
        assert!(text.contains('₹'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["reviewer_name"], "Meera");
        assert_eq!(value[0]["review_date"], "15 January, 2023");
        assert_eq!(value[0]["parsed_date"], "2023-01-15");
        assert_eq!(value[0]["page"], 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_run_writes_empty_array() {
        let dir = scratch_dir("empty").join("nested");
        let path = write_reviews_json(&dir, "acme", &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
