//! CSA Lab conf-track adapter
//!
//! The page is a single table whose header row names the columns. Column
//! names have drifted between page versions, so each record field is read
//! from the first non-empty of several candidate columns.

use crate::error::SourceResult;
use crate::html::{block_text, first_href, first_tag_block, inner_html, tag_blocks, tag_blocks_any};
use crate::http::{HttpClient, HttpConfig};
use crate::Source;
use conftrack_catalog::{Field, RawRecord};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// Conf-track page
pub const CSALAB_URL: &str = "https://csalab.site/conf-track/";

const NAME_COLUMNS: [&str; 4] = ["Conf. Name", "Conference", "Conf", "Name"];
const LOCATION_COLUMNS: [&str; 1] = ["Location"];
const START_COLUMNS: [&str; 1] = ["Start Date"];
const ABSTRACT_COLUMNS: [&str; 1] = ["Abstract Deadline"];
const SUBMISSION_COLUMNS: [&str; 2] = ["Submission Deadline", "Deadline"];
const LINK_COLUMNS: [&str; 3] = ["Website", "Website Link", "Website URL"];

/// CSA Lab conf-track source
#[derive(Debug)]
pub struct CsaLab {
    http: HttpClient,
    url: String,
}

impl CsaLab {
    /// Source for the public page
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        Self::with_url(CSALAB_URL, timeout)
    }

    /// Source for a custom page URL
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        Ok(Self {
            http: HttpClient::new(HttpConfig::browser(timeout).with_user_agent("Mozilla/5.0"))?,
            url: url.into(),
        })
    }
}

impl Source for CsaLab {
    fn name(&self) -> &'static str {
        "csalab"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        let page = self.http.get_text(&self.url)?;
        Ok(parse_table(&page))
    }
}

/// Parse the conf-track table
///
/// A page without a table yields no records.
#[must_use]
pub fn parse_table(page: &str) -> Vec<RawRecord> {
    let Some(table) = first_tag_block(page, "table") else {
        warn!(source = "csalab", "no <table> found");
        return Vec::new();
    };
    let rows = tag_blocks(table, "tr");
    let Some((header_row, body)) = rows.split_first() else {
        return Vec::new();
    };

    let headers: Vec<String> = tag_blocks_any(header_row, &["th", "td"])
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = block_text(cell);
            if text.is_empty() {
                format!("col_{i}")
            } else {
                text
            }
        })
        .collect();

    body.iter()
        .filter_map(|row| parse_row(&headers, row))
        .collect()
}

fn parse_row(headers: &[String], row: &str) -> Option<RawRecord> {
    let cells = tag_blocks_any(row, &["td", "th"]);
    if cells.is_empty() {
        return None;
    }

    let values: HashMap<&str, String> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let value = match cells.get(i) {
                None => String::new(),
                Some(cell) if header.trim().to_lowercase().starts_with("website") => {
                    first_href(inner_html(cell)).unwrap_or_else(|| block_text(cell))
                }
                Some(cell) => block_text(cell),
            };
            (header.as_str(), value)
        })
        .collect();

    let pick = |columns: &[&str]| -> String {
        columns
            .iter()
            .find_map(|column| values.get(column).filter(|v| !v.is_empty()).cloned())
            .unwrap_or_default()
    };

    let name = pick(&NAME_COLUMNS);
    if name.trim().is_empty() {
        return None;
    }

    Some(
        RawRecord::named(name)
            .with(Field::Location, pick(&LOCATION_COLUMNS))
            .with(Field::StartDate, pick(&START_COLUMNS))
            .with(Field::AbstractDeadline, pick(&ABSTRACT_COLUMNS))
            .with(Field::SubmissionDeadline, pick(&SUBMISSION_COLUMNS))
            .with(Field::Link, pick(&LINK_COLUMNS)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_yields_nothing() {
        assert!(parse_table("<html><body>maintenance</body></html>").is_empty());
    }

    #[test]
    fn short_rows_and_blank_headers() {
        let page = "<table><tr><th>Conference</th><th></th><th>Deadline</th></tr>\
                    <tr><td>NDSS 2027</td><td>x</td></tr>\
                    <tr><td></td><td>y</td><td>Jan 1 2026</td></tr></table>";
        let records = parse_table(page);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(Field::Name), "NDSS 2027");
        assert_eq!(records[0].text(Field::SubmissionDeadline), "");
    }

    #[test]
    fn website_column_without_anchor_uses_text() {
        let page = "<table><tr><th>Name</th><th>Website URL</th></tr>\
                    <tr><td>CCS 2026</td><td>https://sigsac.org/ccs</td></tr></table>";
        let records = parse_table(page);
        assert_eq!(records[0].text(Field::Link), "https://sigsac.org/ccs");
    }
}
