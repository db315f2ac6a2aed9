//! Presentation ordering
//!
//! Records with a parseable submission deadline come first, earliest first;
//! the rest follow as one block. Ties break on lower-cased name and the sort
//! is stable.

use crate::canonical::HUMAN_DATE_FORMAT;
use crate::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a deadline into an instant
///
/// Offset-aware ISO-8601 (with `Z` accepted) is tried first, then naive
/// ISO date-times and dates, then the `Mon DD YYYY` form. Naive values are
/// read as UTC.
#[must_use]
pub fn deadline_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let iso = value.replace('Z', "+00:00");
    if let Ok(instant) = DateTime::parse_from_rfc3339(&iso) {
        return Some(instant.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            ["%Y-%m-%d", HUMAN_DATE_FORMAT]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Sort key: parseable first, then instant, then lower-cased name
fn order_key(record: &Record) -> (u8, i64, String) {
    let name = record.name.to_lowercase();
    match deadline_instant(&record.submission_deadline) {
        Some(instant) => (0, instant.timestamp(), name),
        None => (1, i64::MAX, name),
    }
}

/// Sort a catalog in place for presentation
pub fn sort_catalog(records: &mut [Record]) {
    records.sort_by_cached_key(order_key);
}

/// Sorted copy of a catalog
#[must_use]
pub fn ordered(mut records: Vec<Record>) -> Vec<Record> {
    sort_catalog(&mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn with_deadline(name: &str, deadline: &str) -> Record {
        Record::new(name).with(Field::SubmissionDeadline, deadline)
    }

    #[test]
    fn parses_every_accepted_shape() {
        let midnight = Utc.with_ymd_and_hms(2026, 1, 30, 0, 0, 0).unwrap();
        assert_eq!(deadline_instant("Jan 30 2026"), Some(midnight));
        assert_eq!(deadline_instant("2026-01-30"), Some(midnight));
        assert_eq!(deadline_instant("2026-01-30T00:00:00"), Some(midnight));
        assert_eq!(deadline_instant("2026-01-30T00:00:00Z"), Some(midnight));
        assert_eq!(
            deadline_instant("2026-01-29T12:00:00-12:00"),
            Some(midnight)
        );
        assert_eq!(deadline_instant("TBA"), None);
        assert_eq!(deadline_instant(""), None);
    }

    #[test]
    fn parseable_before_unparseable() {
        let sorted = ordered(vec![
            with_deadline("b", "Mar 01 2026"),
            with_deadline("a", ""),
            with_deadline("c", "Jan 10 2026"),
        ]);
        let deadlines: Vec<&str> = sorted.iter().map(|r| r.submission_deadline.as_str()).collect();
        assert_eq!(deadlines, vec!["Jan 10 2026", "Mar 01 2026", ""]);
    }

    #[test]
    fn mixed_forms_compare_as_instants() {
        let sorted = ordered(vec![
            with_deadline("aoe", "2026-01-31T23:59:59-12:00"),
            with_deadline("utc", "Feb 01 2026"),
        ]);
        assert_eq!(sorted[0].name, "utc");
        assert_eq!(sorted[1].name, "aoe");
    }

    #[test]
    fn unparseable_block_orders_by_name() {
        let sorted = ordered(vec![
            with_deadline("Zeta", "soon"),
            with_deadline("alpha", ""),
            with_deadline("Beta", "TBD"),
        ]);
        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let first = with_deadline("Same", "Jan 01 2026").with(Field::Location, "first");
        let second = with_deadline("same", "Jan 01 2026").with(Field::Location, "second");
        let sorted = ordered(vec![first, second]);
        assert_eq!(sorted[0].location, "first");
    }
}
