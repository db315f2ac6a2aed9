//! Canonicalization of raw records
//!
//! Turns any [`RawRecord`] into a [`Record`] whose text is whitespace
//! collapsed, whose dates follow the catalog's preferred shapes and whose
//! subjects are canonical labels. Every function here is total and
//! idempotent: running it on its own output changes nothing.

use crate::patterns::{
    CCF_PREFIX, CCF_WRAPPED, CLOCK_TIME, IN_DAYS, PAREN_NOTE, STRIKE, TRAILING_PAREN, UTC_OFFSET,
};
use crate::record::{Field, RawRecord, Record, UNCATEGORIZED};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use indexmap::IndexSet;

pub use crate::patterns::preflight;

/// Output shape for human dates, e.g. `Jan 30 2026`
pub const HUMAN_DATE_FORMAT: &str = "%b %d %Y";

/// Input shapes accepted by [`clean_deadline`]
const HUMAN_DATE_INPUTS: [&str; 5] = ["%b %d %Y", "%B %d %Y", "%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"];

/// Canonical wireless subject
pub const WIRELESS: &str = "Wireless/Communication";

/// Canonical networking subject
pub const NETWORK_SYSTEM: &str = "Network System";

const WIRELESS_ALIASES: [&str; 2] = ["wireless & communication", "wireless and communication"];

const NETWORK_ALIASES: [&str; 4] = [
    "networking & systems",
    "networking and systems",
    "networks and systems",
    "network system",
];

/// Collapse whitespace runs to one space and trim
#[must_use]
pub fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a subject label to its canonical form
///
/// CCF category wrappers such as `CCF AI (Artificial Intelligence)` are
/// unwrapped until none is left, then known aliases are folded.
#[must_use]
pub fn canonicalize_subject(label: &str) -> String {
    let mut current = collapse_ws(label);
    loop {
        let next = unwrap_ccf(&current);
        if next == current {
            break;
        }
        current = next;
    }

    let lower = current.to_lowercase();
    if WIRELESS_ALIASES.contains(&lower.as_str()) {
        return WIRELESS.to_string();
    }
    if NETWORK_ALIASES.contains(&lower.as_str()) {
        return NETWORK_SYSTEM.to_string();
    }
    current
}

/// One unwrapping pass; the result is never longer than the input
fn unwrap_ccf(label: &str) -> String {
    let mut out = match CCF_WRAPPED.captures(label).and_then(|c| c.get(1)) {
        Some(inner) => collapse_ws(inner.as_str()),
        None => label.to_string(),
    };
    if CCF_PREFIX.is_match(&out) {
        if let Some(inner) = TRAILING_PAREN.captures(&out).and_then(|c| c.get(1)) {
            out = collapse_ws(inner.as_str());
        }
    }
    out
}

/// Canonicalize, drop empties and deduplicate in first-seen order
///
/// An empty result becomes the single sentinel [`UNCATEGORIZED`].
#[must_use]
pub fn normalize_subjects<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: IndexSet<String> = labels
        .into_iter()
        .map(|label| canonicalize_subject(label.as_ref()))
        .filter(|label| !label.is_empty())
        .collect();

    if unique.is_empty() {
        vec![UNCATEGORIZED.to_string()]
    } else {
        unique.into_iter().collect()
    }
}

/// Clean a human-entered date and render it as `Mon DD YYYY` when possible
///
/// Strike-through markup, parenthesized notes, "in N days" countdowns and
/// clock times are removed first. Text that still does not parse is kept in
/// its cleaned form.
#[must_use]
pub fn clean_deadline(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut cleaned = strip_noise(raw);
    loop {
        let next = strip_noise(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    match parse_human_date(&cleaned) {
        Some(date) => date.format(HUMAN_DATE_FORMAT).to_string(),
        None => cleaned,
    }
}

fn strip_noise(text: &str) -> String {
    let text = STRIKE.replace_all(text, "");
    let text = PAREN_NOTE.replace_all(&text, "");
    let text = IN_DAYS.replace_all(&text, "");
    let text = CLOCK_TIME.replace_all(&text, "");
    collapse_ws(&text.replace(';', ""))
}

/// Parse one of the accepted human date shapes
#[must_use]
pub fn parse_human_date(text: &str) -> Option<NaiveDate> {
    HUMAN_DATE_INPUTS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Resolve a timezone token to a fixed offset
///
/// `AoE` is UTC-12, `UTC` is zero, `UTC+N`/`UTC-N` are whole hours. Anything
/// else, including offsets a day or longer, falls back to UTC.
#[must_use]
pub fn tz_offset(token: &str) -> FixedOffset {
    let utc = Utc.fix();
    let token = token.trim().to_uppercase();

    if token == "AOE" {
        return FixedOffset::west_opt(12 * 3600).unwrap_or(utc);
    }
    if token == "UTC" {
        return utc;
    }

    let Some(caps) = UTC_OFFSET.captures(&token) else {
        return utc;
    };
    let hours: i32 = match caps[2].parse() {
        Ok(hours) => hours,
        Err(_) => return utc,
    };
    let seconds = if &caps[1] == "-" { -hours * 3600 } else { hours * 3600 };
    FixedOffset::east_opt(seconds).unwrap_or(utc)
}

/// Convert `YYYY-MM-DD HH:MM:SS` in the given zone to ISO-8601 with offset
///
/// Empty and `TBD` deadlines become empty; unparseable text is returned
/// trimmed.
#[must_use]
pub fn deadline_to_iso(deadline: &str, timezone: &str) -> String {
    let deadline = deadline.trim();
    if deadline.is_empty() || deadline.eq_ignore_ascii_case("TBD") {
        return String::new();
    }

    let offset = tz_offset(timezone);
    NaiveDateTime::parse_from_str(deadline, "%Y-%m-%d %H:%M:%S")
        .ok()
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .map_or_else(
            || deadline.to_string(),
            |local| local.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        )
}

/// Normalize a raw record into a catalog record
#[must_use]
pub fn normalize(raw: &RawRecord) -> Record {
    let mut record = Record {
        subjects: normalize_subjects(raw.subject_labels()),
        ..Record::default()
    };

    for field in Field::ALL {
        *record.text_mut(field) = collapse_ws(&raw.text(field));
    }
    for field in Field::DATES {
        let cleaned = clean_deadline(record.text(field));
        *record.text_mut(field) = cleaned;
    }

    record
}
