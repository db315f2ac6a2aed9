//! ccf-deadlines adapter
//!
//! The `ccfddl/ccf-deadlines` repository keeps one YAML file per conference
//! series under `conference/<CATEGORY>/`. Files are listed through the GitHub
//! contents API and downloaded one by one. Every conference instance inside
//! the configured year window becomes one record per timeline round.
//!
//! The YAML is hand-edited, so values are read leniently: years and dates
//! may be numbers or strings, and list entries that are not mappings are
//! ignored.

use crate::error::{SourceError, SourceResult};
use crate::http::{HttpClient, HttpConfig, DEFAULT_TIMEOUT, TOOL_USER_AGENT};
use crate::Source;
use chrono::NaiveDate;
use conftrack_catalog::canonical::{
    canonicalize_subject, collapse_ws, deadline_to_iso, HUMAN_DATE_FORMAT,
};
use conftrack_catalog::{Field, RawRecord, UNCATEGORIZED};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Contents API root for the repository
pub const CCFDDL_CONTENTS_URL: &str =
    "https://api.github.com/repos/ccfddl/ccf-deadlines/contents";

/// Media type requested from the GitHub API
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Categories fetched by default
pub const DEFAULT_CATEGORIES: [&str; 10] =
    ["DS", "NW", "SC", "SE", "DB", "CT", "CG", "AI", "HI", "MX"];

/// Default first year
pub const DEFAULT_YEAR_FROM: i32 = 2026;

/// Default last year
pub const DEFAULT_YEAR_TO: i32 = 2028;

/// Category code to subject label
const CATEGORY_LABELS: [(&str, &str); 10] = [
    ("DS", "Computer Architecture/Parallel Programming/Storage Technology"),
    ("NW", "Network System"),
    ("SC", "Network and System Security"),
    ("SE", "Software Engineering/Operating System/Programming Language Design"),
    ("DB", "Database/Data Mining/Information Retrieval"),
    ("CT", "Computing Theory"),
    ("CG", "Graphics"),
    ("AI", "Artificial Intelligence"),
    ("HI", "Computer\u{2013}Human Interaction"),
    ("MX", "Interdiscipline/Mixture/Emerging"),
];

static MONTH_ABBR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept?|Oct|Nov|Dec)\b\.?")
        .unwrap_or_else(|e| panic!("month abbreviation pattern: {e}"))
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+\d{1,2}$").unwrap_or_else(|e| panic!("month day pattern: {e}"))
});

fn full_month(abbr: &str) -> Option<&'static str> {
    Some(match abbr {
        "Jan" => "January",
        "Feb" => "February",
        "Mar" => "March",
        "Apr" => "April",
        "Jun" => "June",
        "Jul" => "July",
        "Aug" => "August",
        "Sep" | "Sept" => "September",
        "Oct" => "October",
        "Nov" => "November",
        "Dec" => "December",
        _ => return None,
    })
}

/// Subject label for a category code
///
/// Unknown codes pass through; a missing code is [`UNCATEGORIZED`].
#[must_use]
pub fn category_label(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return UNCATEGORIZED.to_string();
    }
    let label = CATEGORY_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |&(_, label)| label);
    canonicalize_subject(label)
}

/// Split a comma-separated category list
#[must_use]
pub fn parse_categories(list: &str) -> Vec<String> {
    list.split(',')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

// Lenient field readers

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(|value| scalar_text(&value))
        .unwrap_or_default())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Sequence(items)) => items,
        Some(item @ Value::Mapping(_)) => vec![item],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter(Value::is_mapping)
        .filter_map(|item| serde_yaml::from_value(item).ok())
        .collect())
}

/// One conference series file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CcfConference {
    /// Series title, e.g. `INFOCOM`
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,

    /// Category code
    #[serde(default, deserialize_with = "lenient_text")]
    pub sub: String,

    /// Yearly instances
    #[serde(default, deserialize_with = "lenient_list")]
    pub confs: Vec<CcfInstance>,
}

/// One yearly instance of a series
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CcfInstance {
    /// Year, as written
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,

    /// Date range text, e.g. `June 12-17, 2026`
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,

    /// Venue
    #[serde(default, deserialize_with = "lenient_text")]
    pub place: String,

    /// Deadline timezone (`AoE`, `UTC`, `UTC+8`, ...)
    #[serde(default, deserialize_with = "lenient_text")]
    pub timezone: String,

    /// Conference website
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: String,

    /// Submission rounds
    #[serde(default, deserialize_with = "lenient_list")]
    pub timeline: Vec<CcfRound>,
}

impl CcfInstance {
    /// Year as a number; unreadable years are 0
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year.parse().unwrap_or(0)
    }
}

/// One submission round
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CcfRound {
    /// `YYYY-MM-DD HH:MM:SS` or `TBD`
    #[serde(default, deserialize_with = "lenient_text")]
    pub deadline: String,

    /// Abstract deadline, same shape
    #[serde(default, deserialize_with = "lenient_text")]
    pub abstract_deadline: String,

    /// Round label, e.g. `Summer`
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: String,
}

/// Parse one series file
///
/// Files hold either a mapping or a list whose first element is the mapping.
/// Anything else yields `None`.
///
/// # Errors
///
/// Returns [`SourceError::Yaml`] if the text is not YAML.
pub fn parse_conference_yaml(text: &str, origin: &str) -> SourceResult<Option<CcfConference>> {
    let document: Value = serde_yaml::from_str(text).map_err(|e| SourceError::yaml(origin, e))?;
    let mapping = match document {
        Value::Sequence(items) => match items.into_iter().next() {
            Some(first @ Value::Mapping(_)) => first,
            _ => return Ok(None),
        },
        mapping @ Value::Mapping(_) => mapping,
        _ => return Ok(None),
    };
    serde_yaml::from_value(mapping)
        .map(Some)
        .map_err(|e| SourceError::yaml(origin, e))
}

fn parse_month_day(text: &str, year: i32) -> Option<String> {
    let text = text.trim().trim_end_matches(',').trim();
    NaiveDate::parse_from_str(&format!("{text}, {year}"), "%B %d, %Y")
        .ok()
        .map(|date| date.format(HUMAN_DATE_FORMAT).to_string())
}

/// Start and end dates from an instance `date` field, as `Mon DD YYYY`
///
/// Accepts `June 12-17, 2026`, `April 29-May 4, 2026` and `May 19, 2026`,
/// with month abbreviations and en-dashes. Unreadable text gives two empty
/// strings.
#[must_use]
pub fn parse_date_range(date: &str, year: i32) -> (String, String) {
    let text = collapse_ws(&date.replace(&year.to_string(), ""));
    let text = text.replace(['\u{2013}', '\u{2014}'], "-");
    let text = MONTH_ABBR.replace_all(&text, |caps: &Captures<'_>| {
        full_month(&caps[1]).map_or_else(|| caps[0].to_string(), str::to_string)
    });
    let text = text.trim().trim_end_matches(',').trim();
    if text.is_empty() {
        return (String::new(), String::new());
    }

    let Some((left, right)) = text.split_once('-') else {
        return parse_month_day(text, year)
            .map(|day| (day.clone(), day))
            .unwrap_or_default();
    };

    let left = left.trim().trim_end_matches(',').trim();
    let mut right = right.trim().to_string();
    if !right.chars().any(char::is_alphabetic) {
        if let Some(caps) = MONTH_DAY.captures(left) {
            right = format!("{} {right}", &caps[1]);
        }
    }

    match (parse_month_day(left, year), parse_month_day(&right, year)) {
        (Some(start), Some(end)) => (start, end),
        _ => (String::new(), String::new()),
    }
}

/// Expand series files into raw records
///
/// Instances outside `year_from..=year_to` are dropped. Each timeline round
/// is one record; an instance without rounds is one record with empty
/// deadlines.
#[must_use]
pub fn to_raw_records(confs: &[CcfConference], year_from: i32, year_to: i32) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for conf in confs {
        let label = category_label(&conf.sub);

        for inst in &conf.confs {
            let year = inst.year();
            if year < year_from || year > year_to {
                continue;
            }
            let (start, end) = parse_date_range(&inst.date, year);
            let base = |suffix: &str| {
                RawRecord::named(format!("{} {year}{suffix}", conf.title).trim().to_string())
                    .with_subject(label.clone())
                    .with(Field::Location, inst.place.clone())
                    .with(Field::StartDate, start.clone())
                    .with(Field::EndDate, end.clone())
                    .with(Field::Link, inst.link.clone())
            };

            if inst.timeline.is_empty() {
                records.push(base(""));
                continue;
            }
            for round in &inst.timeline {
                let suffix = if round.comment.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", round.comment)
                };
                records.push(
                    base(&suffix)
                        .with(
                            Field::AbstractDeadline,
                            deadline_to_iso(&round.abstract_deadline, &inst.timezone),
                        )
                        .with(
                            Field::SubmissionDeadline,
                            deadline_to_iso(&round.deadline, &inst.timezone),
                        ),
                );
            }
        }
    }
    records
}

/// `(file name, download URL)` of every `.yml` entry in a contents listing
#[must_use]
pub fn series_files(listing: &serde_json::Value) -> Vec<(&str, &str)> {
    fn field<'a>(item: &'a serde_json::Value, key: &str) -> Option<&'a str> {
        item.get(key).and_then(serde_json::Value::as_str)
    }

    listing
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Some((field(item, "name")?, field(item, "download_url")?)))
                .filter(|(name, download)| name.ends_with(".yml") && !download.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// ccf-deadlines settings
#[derive(Debug, Clone)]
pub struct CcfOptions {
    /// Category codes to list
    pub categories: Vec<String>,

    /// First year kept
    pub year_from: i32,

    /// Last year kept
    pub year_to: i32,

    /// GitHub token; raises the API rate limit
    pub token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CcfOptions {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            year_from: DEFAULT_YEAR_FROM,
            year_to: DEFAULT_YEAR_TO,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// ccf-deadlines source
#[derive(Debug)]
pub struct CcfDeadlines {
    http: HttpClient,
    options: CcfOptions,
}

impl CcfDeadlines {
    /// Create the source
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(options: CcfOptions) -> SourceResult<Self> {
        let config = HttpConfig::browser(options.timeout)
            .with_user_agent(TOOL_USER_AGENT)
            .with_accept(GITHUB_ACCEPT)
            .with_bearer_token(options.token.clone());
        Ok(Self {
            http: HttpClient::new(config)?,
            options,
        })
    }

    /// Settings in use
    #[must_use]
    pub fn options(&self) -> &CcfOptions {
        &self.options
    }

    /// Download and parse every series file of one category
    ///
    /// A file that fails to download or parse is skipped.
    ///
    /// # Errors
    ///
    /// Listing failures, and rate limits on any request.
    pub fn fetch_category(&self, category: &str) -> SourceResult<Vec<CcfConference>> {
        let url = format!("{CCFDDL_CONTENTS_URL}/conference/{category}");
        let listing: serde_json::Value = self.http.get_json(&url)?;
        if !listing.is_array() {
            warn!(category, "contents listing is not an array");
            return Ok(Vec::new());
        }

        let mut confs = Vec::new();
        for (name, download) in series_files(&listing) {
            let text = match self.http.get_text(download) {
                Ok(text) => text,
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => {
                    warn!(file = name, error = %e, "series file download failed");
                    continue;
                }
            };
            match parse_conference_yaml(&text, download) {
                Ok(Some(conf)) => confs.push(conf),
                Ok(None) => debug!(file = name, "series file has no mapping"),
                Err(e) => warn!(file = name, error = %e, "series file skipped"),
            }
        }
        info!(category, files = confs.len(), "ccf-deadlines category listed");
        Ok(confs)
    }
}

impl Source for CcfDeadlines {
    fn name(&self) -> &'static str {
        "ccfddl"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        let mut confs = Vec::new();
        for category in &self.options.categories {
            match self.fetch_category(category) {
                Ok(batch) => confs.extend(batch),
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => warn!(category = %category, error = %e, "category skipped"),
            }
        }
        Ok(to_raw_records(
            &confs,
            self.options.year_from,
            self.options.year_to,
        ))
    }
}
