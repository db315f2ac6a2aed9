//! conftrack source adapters
//!
//! Each adapter fetches one feed and turns it into [`RawRecord`]s. Fetching
//! and parsing are split so the parse step can run offline over captured
//! pages.
//!
//! - **csalab**: CSA Lab conf-track table
//! - **easychair**: EasyChair CFP list plus detail pages
//! - **edas**: user-maintained watchlist of EDAS pages
//! - **ccfddl**: ccf-deadlines YAML files on GitHub

#![warn(missing_docs)]

pub mod ccfddl;
pub mod csalab;
pub mod easychair;
pub mod edas;
pub mod error;
pub mod html;
pub mod http;

use conftrack_catalog::RawRecord;
use tracing::{info, warn};

// Re-exports
pub use ccfddl::{CcfDeadlines, CcfOptions};
pub use csalab::CsaLab;
pub use easychair::EasyChair;
pub use edas::EdasWatchlist;
pub use error::{SourceError, SourceResult};
pub use http::{HttpClient, HttpConfig};

/// A feed of raw conference records
pub trait Source {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fetch and parse the feed
    ///
    /// # Errors
    ///
    /// Any [`SourceError`]; callers treat it as "no records from this source".
    fn fetch(&mut self) -> SourceResult<Vec<RawRecord>>;
}

/// Run every source in order and concatenate their records
///
/// A failing source is logged and skipped.
pub fn collect_all(sources: &mut [Box<dyn Source>]) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for source in sources.iter_mut() {
        match source.fetch() {
            Ok(batch) => {
                info!(source = source.name(), records = batch.len(), "source fetched");
                records.extend(batch);
            }
            Err(e) => warn!(source = source.name(), error = %e, "source failed, skipping"),
        }
    }
    records
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Vec<&'static str>);

    impl Source for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
            Ok(self.1.iter().map(|name| RawRecord::named(*name)).collect())
        }
    }

    struct Broken;

    impl Source for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn fetch(&mut self) -> SourceResult<Vec<RawRecord>> {
            Err(SourceError::Status {
                url: "https://down.example".to_string(),
                status: 503,
            })
        }
    }

    #[test]
    fn failures_do_not_stop_collection() {
        let mut sources: Vec<Box<dyn Source>> = vec![
            Box::new(Fixed("first", vec!["A", "B"])),
            Box::new(Broken),
            Box::new(Fixed("last", vec!["C"])),
        ];
        let records = collect_all(&mut sources);
        let names: Vec<String> = records
            .iter()
            .map(|r| r.text(conftrack_catalog::Field::Name))
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
