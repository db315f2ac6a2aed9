//! EasyChair CFP list adapter
//!
//! Rows are kept only when their topics or name mention one of the interest
//! terms. Rows that link to a detail page get their official website and
//! abstract deadline from it; detail lookups are cached per adapter.

use crate::error::{SourceError, SourceResult};
use crate::html::{
    attr, block_text, first_href, first_tag_block, has_class, inner_html, open_tag, open_tags,
    page_text, tag_blocks,
};
use crate::http::{HttpClient, HttpConfig};
use crate::Source;
use conftrack_catalog::canonical::{NETWORK_SYSTEM, WIRELESS};
use conftrack_catalog::{Field, RawRecord};
use moka::sync::Cache;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

/// CFP list page
pub const EASYCHAIR_CFP_URL: &str = "https://easychair.org/cfp/";

/// Subject for security and privacy venues
pub const SECURITY_PRIVACY: &str = "Security & Privacy";

/// Interest terms, in match order
pub const INTEREST_TERMS: [&str; 8] = [
    "5g",
    "6g",
    "communication",
    "wireless",
    "signal",
    "network",
    "security",
    "privacy",
];

const DETAIL_CACHE_CAPACITY: u64 = 4_096;

static ABSTRACT_DEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Abstract\s+deadline\s*[:\-]?\s*([A-Za-z]{3,9}\s+\d{1,2},?\s+\d{4}|\d{4}-\d{2}-\d{2})")
        .unwrap_or_else(|e| panic!("abstract deadline pattern: {e}"))
});

/// Subject implied by an interest term
#[must_use]
pub fn subject_for_term(term: &str) -> &'static str {
    match term {
        "security" | "privacy" => SECURITY_PRIVACY,
        "network" => NETWORK_SYSTEM,
        _ => WIRELESS,
    }
}

/// First interest term found in `haystack` (lowercased)
#[must_use]
pub fn match_interest(haystack: &str) -> Option<&'static str> {
    let haystack = haystack.to_lowercase();
    INTEREST_TERMS.iter().copied().find(|term| haystack.contains(term))
}

/// One kept row of the list table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfpRow {
    /// Acronym, else full name
    pub title: String,

    /// Venue
    pub location: String,

    /// Submission deadline text (or `data-key` fallback)
    pub submission: String,

    /// Start date text (or `data-key` fallback)
    pub start: String,

    /// Subject from the first matched interest term
    pub subject: &'static str,

    /// Absolute detail page URL
    pub detail_url: Option<String>,
}

/// Values scraped from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfpDetail {
    /// First external website link
    pub website: String,

    /// Abstract deadline text
    pub abstract_deadline: String,
}

impl CfpRow {
    /// Build the raw record, with detail values when available
    #[must_use]
    pub fn into_record(self, detail: &CfpDetail) -> RawRecord {
        RawRecord::named(self.title)
            .with_subjects([self.subject])
            .with(Field::Location, self.location)
            .with(Field::StartDate, self.start)
            .with(Field::SubmissionDeadline, self.submission)
            .with(Field::AbstractDeadline, detail.abstract_deadline.clone())
            .with(Field::Link, detail.website.clone())
    }
}

/// EasyChair CFP source
#[derive(Debug)]
pub struct EasyChair {
    http: HttpClient,
    url: String,
    details: Cache<String, CfpDetail>,
}

impl EasyChair {
    /// Source for the public CFP list
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        Self::with_url(EASYCHAIR_CFP_URL, timeout)
    }

    /// Source for a custom list URL
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        Ok(Self {
            http: HttpClient::new(HttpConfig::browser(timeout))?,
            url: url.into(),
            details: Cache::builder().max_capacity(DETAIL_CACHE_CAPACITY).build(),
        })
    }

    /// Detail values for a page, fetched once per URL
    ///
    /// Failures are not cached and yield empty values.
    pub fn detail(&self, url: &str) -> CfpDetail {
        self.details
            .try_get_with(url.to_string(), || {
                self.http.get_text(url).map(|page| parse_detail(&page))
            })
            .unwrap_or_else(|e: std::sync::Arc<SourceError>| {
                debug!(url, error = %e, "detail page unavailable");
                CfpDetail::default()
            })
    }

    /// Number of cached detail pages
    #[must_use]
    pub fn cached_details(&self) -> u64 {
        self.details.run_pending_tasks();
        self.details.entry_count()
    }
}

impl Source for EasyChair {
    fn name(&self) -> &'static str {
        "easychair"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        let page = self.http.get_text(&self.url)?;
        let base = Url::parse(&self.url).map_err(|e| SourceError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        Ok(parse_list(&page, &base)
            .into_iter()
            .map(|row| {
                let detail = row
                    .detail_url
                    .as_deref()
                    .map(|url| self.detail(url))
                    .unwrap_or_default();
                row.into_record(&detail)
            })
            .collect())
    }
}

/// Parse the CFP list, keeping rows that match an interest term
#[must_use]
pub fn parse_list(page: &str, base: &Url) -> Vec<CfpRow> {
    let Some(table) = first_tag_block(page, "table") else {
        warn!(source = "easychair", "no <table> found");
        return Vec::new();
    };

    tag_blocks(table, "tbody")
        .into_iter()
        .flat_map(|tbody| tag_blocks(tbody, "tr"))
        .filter_map(|row| parse_row(row, base))
        .collect()
}

fn parse_row(row: &str, base: &Url) -> Option<CfpRow> {
    let cells = tag_blocks(row, "td");
    if cells.len() < 6 {
        return None;
    }

    let acronym = block_text(cells[0]);
    let name = block_text(cells[1]);
    let topics: Vec<String> = tag_blocks(cells[5], "span")
        .into_iter()
        .filter(|span| has_class(open_tag(span), "tag"))
        .map(block_text)
        .filter(|topic| !topic.is_empty())
        .collect();

    let term = match_interest(&format!("{} {name}", topics.join("; ")))?;

    let detail_url = first_href(inner_html(cells[0]))
        .filter(|href| !href.is_empty())
        .and_then(|href| match base.join(&href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!(href = %href, error = %e, "unusable detail link");
                None
            }
        });

    Some(CfpRow {
        title: if acronym.is_empty() { name } else { acronym },
        location: block_text(cells[2]),
        submission: text_or_key(cells[3]),
        start: text_or_key(cells[4]),
        subject: subject_for_term(term),
        detail_url,
    })
}

/// Cell text, falling back to its `data-key` attribute
fn text_or_key(cell: &str) -> String {
    let text = block_text(cell);
    if text.is_empty() {
        attr(open_tag(cell), "data-key").unwrap_or_default()
    } else {
        text
    }
}

/// Parse a CFP detail page
#[must_use]
pub fn parse_detail(page: &str) -> CfpDetail {
    let website = open_tags(page, "a")
        .into_iter()
        .filter_map(|tag| attr(tag, "href"))
        .map(|href| href.trim().to_string())
        .find(|href| href.starts_with("http") && !href.contains("easychair.org"))
        .unwrap_or_default();

    let abstract_deadline = ABSTRACT_DEADLINE
        .captures(&page_text(page))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    CfpDetail {
        website,
        abstract_deadline,
    }
}
