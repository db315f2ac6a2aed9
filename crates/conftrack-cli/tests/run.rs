use conftrack_catalog::{load_catalog, Field, RawRecord};
use conftrack_cli::{build_sources, run, run_with_sources, RunConfig};
use conftrack_sources::{Source, SourceError, SourceResult};
use conftrack_test_utils::fixtures::BASELINE_JSON;
use conftrack_test_utils::{names, raw_linked};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Fixed(Vec<RawRecord>);

impl Source for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        Ok(self.0.clone())
    }
}

struct Down;

impl Source for Down {
    fn name(&self) -> &'static str {
        "down"
    }

    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
        Err(SourceError::Status {
            url: "https://feed.example".to_string(),
            status: 502,
        })
    }
}

fn offline(dir: &TempDir, input: &str, output: &str) -> RunConfig {
    let mut config = RunConfig::offline(dir.path().join(input), dir.path().join(output));
    config.edas_watchlist = dir.path().join("no-watchlist.yaml");
    config
}

fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

#[test]
fn offline_run_normalizes_baseline() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in.json"), BASELINE_JSON);
    let config = offline(&dir, "in.json", "out/catalog.json");

    let summary = run(&config).unwrap();
    assert_eq!(summary.sources, 0);
    assert_eq!(summary.total, 2);

    let written = load_catalog(&config.output).unwrap();
    assert_eq!(names(&written), vec!["INFOCOM 2026", "IEEE ICC 2026"]);
    assert_eq!(written[0].subjects, vec!["Network System"]);
    assert_eq!(written[1].subjects, vec!["Wireless/Communication"]);
}

#[test]
fn second_run_is_a_fixed_point() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in.json"), BASELINE_JSON);
    run(&offline(&dir, "in.json", "first.json")).unwrap();
    run(&offline(&dir, "first.json", "second.json")).unwrap();

    let first = fs::read_to_string(dir.path().join("first.json")).unwrap();
    let second = fs::read_to_string(dir.path().join("second.json")).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with("]\n"));
}

#[test]
fn sources_merge_and_failures_are_skipped() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in.json"), BASELINE_JSON);
    let config = offline(&dir, "in.json", "out.json");

    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(Down),
        Box::new(Fixed(vec![
            raw_linked("INFOCOM 2026", "https://infocom2026.ieee-infocom.org/")
                .with(Field::Notification, "Dec 1 2025"),
            raw_linked("NSDI 2027", "https://www.usenix.org/conference/nsdi27"),
        ])),
    ];
    let summary = run_with_sources(&config, sources).unwrap();
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.stats.updated, 1);
    assert_eq!(summary.stats.added, 1);
    assert_eq!(summary.total, 3);

    let written = load_catalog(&config.output).unwrap();
    let infocom = written.iter().find(|r| r.name == "INFOCOM 2026").unwrap();
    assert_eq!(infocom.notification, "Dec 01 2025");
    assert_eq!(infocom.location, "Tokyo, Japan");
}

#[test]
fn missing_baseline_starts_empty() {
    let dir = TempDir::new().unwrap();
    let config = offline(&dir, "absent.json", "out.json");
    let sources: Vec<Box<dyn Source>> = vec![Box::new(Fixed(vec![raw_linked("A 2026", "https://a")]))];

    let summary = run_with_sources(&config, sources).unwrap();
    assert_eq!(summary.stats.baseline, 0);
    assert_eq!(names(&load_catalog(&config.output).unwrap()), vec!["A 2026"]);
}

#[test]
fn malformed_baseline_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in.json"), "[{\"name\": ");
    let config = offline(&dir, "in.json", "out.json");

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("loading baseline"));
    assert!(!config.output.exists());
}

#[test]
fn watchlist_controls_edas_source() {
    let dir = TempDir::new().unwrap();
    let mut config = offline(&dir, "in.json", "out.json");
    assert!(build_sources(&config).is_empty());

    config.edas_watchlist = dir.path().join("watch.yaml");
    write(&config.edas_watchlist, "urls: []\n");
    assert!(build_sources(&config).is_empty());

    write(&config.edas_watchlist, "urls:\n  - https://edas.info/N1\n");
    let sources = build_sources(&config);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name(), "edas");

    write(&config.edas_watchlist, "urls: [unclosed\n");
    assert!(build_sources(&config).is_empty());
}

#[test]
fn malformed_watchlist_still_writes_catalog() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in.json"), BASELINE_JSON);
    let mut config = offline(&dir, "in.json", "out.json");
    config.edas_watchlist = dir.path().join("watch.yaml");
    write(&config.edas_watchlist, "urls: [unclosed\n");

    let summary = run(&config).unwrap();
    assert_eq!(summary.sources, 0);
    assert_eq!(summary.total, 2);
    assert_eq!(
        names(&load_catalog(&config.output).unwrap()),
        vec!["INFOCOM 2026", "IEEE ICC 2026"]
    );
}
