//! Testing utilities for the conftrack workspace
//!
//! Captured feed pages for offline adapter tests, plus short builders for
//! records and catalogs.

#![allow(missing_docs)]

use conftrack_catalog::{Field, RawRecord, Record};

/// Captured pages and documents, one per adapter
pub mod fixtures {
    pub const CSALAB_PAGE: &str = include_str!("../fixtures/csalab.html");
    pub const EASYCHAIR_LIST: &str = include_str!("../fixtures/easychair_list.html");
    pub const EASYCHAIR_DETAIL: &str = include_str!("../fixtures/easychair_detail.html");
    pub const EDAS_PAGE: &str = include_str!("../fixtures/edas.html");
    pub const CCF_INFOCOM_YML: &str = include_str!("../fixtures/ccf_infocom.yml");
    pub const CCF_CONTENTS_JSON: &str = include_str!("../fixtures/ccf_contents.json");
    pub const BASELINE_JSON: &str = include_str!("../fixtures/baseline.json");

    /// List URL the EasyChair fixture was captured from
    pub const EASYCHAIR_BASE: &str = "https://easychair.org/cfp/";
}

pub fn raw(name: &str) -> RawRecord {
    RawRecord::named(name)
}

pub fn raw_linked(name: &str, link: &str) -> RawRecord {
    RawRecord::named(name).with(Field::Link, link)
}

pub fn record(name: &str, link: &str, subjects: &[&str]) -> Record {
    let record = Record::new(name).with(Field::Link, link);
    if subjects.is_empty() {
        record
    } else {
        record.with_subjects(subjects.iter().copied())
    }
}

/// Serialize records the way the store writes them
pub fn catalog_json(records: &[Record]) -> String {
    let mut json = serde_json::to_string_pretty(records).unwrap();
    json.push('\n');
    json
}

/// Names in catalog order
pub fn names(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}
