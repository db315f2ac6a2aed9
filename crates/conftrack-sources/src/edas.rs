//! EDAS watchlist adapter
//!
//! EDAS has no public list of calls, so this adapter scrapes a user-kept
//! list of conference pages. The watchlist is a YAML mapping:
//!
//! ```yaml
//! urls:
//!   - https://edas.info/web/icc2026/
//!   - https://edas.info/N26675
//! ```

use crate::error::{SourceError, SourceResult};
use crate::html::{block_text, first_tag_block, page_text, tag_blocks_any, text_lines};
use crate::http::{HttpClient, HttpConfig};
use crate::Source;
use conftrack_catalog::canonical::{clean_deadline, collapse_ws, WIRELESS};
use conftrack_catalog::{Field, RawRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default watchlist location
pub const DEFAULT_WATCHLIST_PATH: &str = "config/edas_watchlist.yaml";

/// Number of leading text lines searched for the date line
const DATE_LINE_WINDOW: usize = 60;

static YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(19|20)\d{2}\b").unwrap_or_else(|e| panic!("year pattern: {e}"))
});

static MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Jan(uary)?|Feb(ruary)?|Mar(ch)?|Apr(il)?|May|June?|July?|Aug(ust)?|Sep(t(ember)?)?|Oct(ober)?|Nov(ember)?|Dec(ember)?)\b",
    )
    .unwrap_or_else(|e| panic!("month pattern: {e}"))
});

static SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*[|\x{2022}]\s*").unwrap_or_else(|e| panic!("separator pattern: {e}"))
});

static SUBMISSION_DEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(Paper\s+Submission\s+Deadline|Submission\s+Deadline)\s*[:\-]?\s*([A-Za-z]{3,9}\s+\d{1,2},?\s+\d{4}|\d{4}-\d{2}-\d{2})",
    )
    .unwrap_or_else(|e| panic!("submission deadline pattern: {e}"))
});

#[derive(Debug, Deserialize)]
struct WatchlistFile {
    #[serde(default)]
    urls: Option<UrlList>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UrlList {
    One(String),
    Many(Vec<Option<String>>),
}

impl UrlList {
    fn into_urls(self) -> Vec<String> {
        let urls = match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls.into_iter().flatten().collect(),
        };
        urls.into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// Parse watchlist YAML text into its URLs
///
/// # Errors
///
/// Returns [`SourceError::Yaml`] if the text is not a watchlist mapping.
pub fn parse_watchlist(text: &str, origin: &str) -> SourceResult<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: Option<WatchlistFile> =
        serde_yaml::from_str(text).map_err(|e| SourceError::yaml(origin, e))?;
    Ok(file
        .and_then(|file| file.urls)
        .map(UrlList::into_urls)
        .unwrap_or_default())
}

/// Read the watchlist; a missing file is an empty list
///
/// # Errors
///
/// I/O failures other than "not found", and malformed YAML.
pub fn load_watchlist(path: &Path) -> SourceResult<Vec<String>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SourceError::io(path, e)),
    };
    parse_watchlist(&text, &path.display().to_string())
}

/// EDAS watchlist source
#[derive(Debug)]
pub struct EdasWatchlist {
    http: HttpClient,
    urls: Vec<String>,
}

impl EdasWatchlist {
    /// Source over an explicit URL list
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(urls: Vec<String>, timeout: Duration) -> SourceResult<Self> {
        Ok(Self {
            http: HttpClient::new(HttpConfig::browser(timeout).with_user_agent("Mozilla/5.0"))?,
            urls,
        })
    }

    /// Source over the watchlist file, or `None` when there is nothing to watch
    ///
    /// # Errors
    ///
    /// Unreadable or malformed watchlist files, and HTTP client failures.
    pub fn from_file(path: &Path, timeout: Duration) -> SourceResult<Option<Self>> {
        let urls = load_watchlist(path)?;
        if urls.is_empty() {
            info!(path = %path.display(), "EDAS watchlist empty or missing, skipping");
            return Ok(None);
        }
        Self::new(urls, timeout).map(Some)
    }

    /// Watched URLs
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl Source for EdasWatchlist {
    fn name(&self) -> &'static str {
        "edas"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        let mut records = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            match self.http.get_text(url) {
                Ok(page) => records.push(parse_page(&page, url)),
                Err(e) => warn!(url = %url, error = %e, "EDAS page failed, skipping"),
            }
        }
        Ok(records)
    }
}

/// Parse one conference page
#[must_use]
pub fn parse_page(page: &str, url: &str) -> RawRecord {
    let (start, location) = date_line(page).unwrap_or_default();

    let submission = SUBMISSION_DEADLINE
        .captures(&page_text(page))
        .and_then(|caps| caps.get(2))
        .map(|m| clean_deadline(m.as_str()))
        .unwrap_or_default();

    RawRecord::named(page_title(page).unwrap_or_else(|| collapse_ws(url)))
        .with_subject(WIRELESS)
        .with(Field::Location, location)
        .with(Field::StartDate, start)
        .with(Field::SubmissionDeadline, submission)
        .with(Field::Link, url)
}

fn page_title(page: &str) -> Option<String> {
    let heading = tag_blocks_any(page, &["h1", "h2"])
        .into_iter()
        .next()
        .map(block_text)
        .filter(|text| !text.is_empty());

    heading
        .or_else(|| {
            first_tag_block(page, "title")
                .map(block_text)
                .filter(|text| !text.is_empty())
        })
        .map(|title| collapse_ws(&title))
}

/// Start date and location from the first dated line, e.g.
/// `June 2-5, 2026 | Duisburg, Germany`
fn date_line(page: &str) -> Option<(String, String)> {
    let line = text_lines(page)
        .into_iter()
        .take(DATE_LINE_WINDOW)
        .find(|line| YEAR.is_match(line) && MONTH.is_match(line))?;

    let mut parts = SEPARATOR.split(&line);
    let start = clean_deadline(parts.next().unwrap_or_default().trim());
    let location = parts.next().map(collapse_ws).unwrap_or_default();
    Some((start, location))
}
