use conftrack_catalog::canonical::{canonicalize_subject, clean_deadline};
use conftrack_catalog::merge::{FreshestWins, MergePolicy};
use conftrack_catalog::{normalize, update, Field, RawRecord, Record, Resolver};
use proptest::prelude::*;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn conference_name() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec![
            "ICC",
            "IEEE INFOCOM",
            "NDSS",
            "FooConf",
            "ACM MobiCom",
            "USENIX Security",
        ]),
        prop::option::of(1u8..4),
        prop::option::of(2024u32..2029),
    )
        .prop_map(|(base, cycle, year)| {
            let mut name = base.to_string();
            if let Some(cycle) = cycle {
                name.push_str(&format!(" Cycle {cycle}"));
            }
            if let Some(year) = year {
                name.push_str(&format!(" {year}"));
            }
            name
        })
}

fn date_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (1u32..29, 0usize..12, 2024i32..2029)
            .prop_map(|(day, month, year)| format!("{} {day}, {year}", MONTHS[month])),
        (1u32..29, 1u32..13, 2024i32..2029)
            .prop_map(|(day, month, year)| format!("{year}-{month:02}-{day:02}")),
        (1u32..29, 1u32..13, 2024i32..2029)
            .prop_map(|(day, month, year)| format!("{year}-{month:02}-{day:02}T23:59:59-12:00")),
        "[ -~]{0,24}",
    ]
}

fn subject_labels() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "CCF NW (Network System)",
            "Networking & Systems",
            "Wireless & Communication",
            "CCF AI (Artificial Intelligence)",
            "Graphics",
            "",
        ]),
        0..4,
    )
}

fn raw_record() -> impl Strategy<Value = RawRecord> {
    (
        conference_name(),
        subject_labels(),
        prop::option::of(prop::sample::select(vec!["Paris", "Seoul", "  Rio  de Janeiro "])),
        date_text(),
        date_text(),
        prop::option::of(prop::sample::select(vec![
            "https://a.org",
            "https://B.org",
            "https://c.org/2026",
        ])),
    )
        .prop_map(|(name, subjects, location, start, submission, link)| {
            RawRecord::named(name)
                .with_subjects(subjects)
                .with(Field::Location, location.unwrap_or_default())
                .with(Field::StartDate, start)
                .with(Field::SubmissionDeadline, submission)
                .with(Field::Link, link.unwrap_or_default())
        })
}

fn record() -> impl Strategy<Value = Record> {
    raw_record().prop_map(|raw| normalize(&raw))
}

proptest! {
    #[test]
    fn prop_subject_canonicalization_is_idempotent(
        label in prop_oneof![
            ".{0,40}",
            "[Cc][Cc][Ff] +[A-Z]{1,3} *\\((CCF [A-Z]{2} \\()?[ -~]{0,20}\\)?\\)",
        ]
    ) {
        let once = canonicalize_subject(&label);
        prop_assert_eq!(canonicalize_subject(&once), once);
    }

    #[test]
    fn prop_clean_deadline_is_idempotent(text in prop_oneof![date_text(), ".{0,40}"]) {
        let once = clean_deadline(&text);
        prop_assert_eq!(clean_deadline(&once), once);
    }

    #[test]
    fn prop_normalize_is_idempotent(raw in raw_record()) {
        let once = normalize(&raw);
        prop_assert_eq!(once.normalized(), once);
    }

    #[test]
    fn prop_subjects_never_empty(raw in raw_record()) {
        let record = normalize(&raw);
        prop_assert!(!record.subjects.is_empty());
        prop_assert!(record.subjects.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn prop_merge_never_erases(old in record(), new in record()) {
        let merged = FreshestWins.merge(&old, &new);
        for field in Field::ALL {
            if !old.text(field).is_empty() {
                prop_assert!(!merged.text(field).is_empty(), "{} erased", field);
            }
            if !old.text(field).is_empty() && new.text(field).is_empty() {
                prop_assert_eq!(merged.text(field), old.text(field));
            }
        }
        for subject in &old.subjects {
            prop_assert!(merged.subjects.contains(subject));
        }
    }

    #[test]
    fn prop_resolver_never_deletes(
        baseline in prop::collection::vec(record(), 0..8),
        incoming in prop::collection::vec(record(), 0..12),
    ) {
        let mut resolver = Resolver::new(baseline.clone());
        resolver.resolve_all(incoming);
        let stats = resolver.stats();
        let catalog = resolver.finish().catalog;

        prop_assert_eq!(catalog.len(), baseline.len() + stats.added);
        for (before, after) in baseline.iter().zip(&catalog) {
            if !before.link.is_empty() {
                prop_assert_eq!(&after.link, &before.link);
            }
            prop_assert!(after.name.chars().count() >= before.name.chars().count());
            for field in Field::REFRESHABLE {
                if !before.text(field).is_empty() {
                    prop_assert!(!after.text(field).is_empty());
                }
            }
            for subject in &before.subjects {
                prop_assert!(after.subjects.contains(subject));
            }
        }
    }

    #[test]
    fn prop_update_keeps_every_baseline_link(
        baseline in prop::collection::vec(record(), 0..8),
        incoming in prop::collection::vec(raw_record(), 0..12),
    ) {
        let outcome = update(baseline.clone(), incoming);
        prop_assert_eq!(outcome.catalog.len(), baseline.len() + outcome.stats.added);
        for before in baseline.iter().filter(|r| !r.link.is_empty()) {
            prop_assert!(outcome.catalog.iter().any(|after| after.link == before.link));
        }
    }

    #[test]
    fn prop_rerun_without_input_is_fixed_point(
        baseline in prop::collection::vec(record(), 0..8),
        incoming in prop::collection::vec(raw_record(), 0..8),
    ) {
        let first = update(baseline, incoming).catalog;
        let second = update(first.clone(), Vec::new()).catalog;
        prop_assert_eq!(second, first);
    }
}
