//! Resolution engine
//!
//! Folds incoming records into the catalog one at a time. Each record is
//! matched through the [`CatalogIndex`] by link, then exact name, then series
//! name; a hit is merged in place under the engine's [`MergePolicy`], a miss is
//! appended. Catalog entries are never removed.
//!
//! The fold is order dependent: with first-writer-wins registration, feeding
//! the same records in a different order can group ambiguous series names
//! differently.

use crate::index::CatalogIndex;
use crate::keys::{KeyKind, KeyTriple};
use crate::merge::{FreshestWins, MergePolicy};
use crate::record::Record;
use tracing::{debug, info};

/// Outcome of resolving one incoming record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Appended as a new catalog entry
    Added {
        /// Position of the new entry
        position: usize,
    },

    /// Merged into an existing entry
    Merged {
        /// Position of the entry that absorbed the record
        position: usize,
        /// Key kind that matched
        via: KeyKind,
    },
}

impl Resolution {
    /// Catalog position touched by this resolution
    #[inline]
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            Self::Added { position } | Self::Merged { position, .. } => position,
        }
    }
}

/// Counters for one resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Entries in the baseline
    pub baseline: usize,

    /// Records appended
    pub added: usize,

    /// Records merged into an existing entry
    pub updated: usize,

    /// Merges matched by link
    pub via_link: usize,

    /// Merges matched by exact name
    pub via_name: usize,

    /// Merges matched by series name
    pub via_series: usize,
}

impl ResolveStats {
    fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Added { .. } => self.added += 1,
            Resolution::Merged { via, .. } => {
                self.updated += 1;
                match via {
                    KeyKind::Link => self.via_link += 1,
                    KeyKind::ExactName => self.via_name += 1,
                    KeyKind::Series => self.via_series += 1,
                }
            }
        }
    }
}

/// Resolved catalog and counters, returned by [`Resolver::finish`]
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Catalog in insertion order
    pub catalog: Vec<Record>,

    /// Run counters
    pub stats: ResolveStats,
}

/// Entity-resolution engine over an indexed catalog
#[derive(Debug)]
pub struct Resolver<P: MergePolicy = FreshestWins> {
    catalog: Vec<Record>,
    index: CatalogIndex,
    policy: P,
    stats: ResolveStats,
}

impl Resolver<FreshestWins> {
    /// Index `existing` under the default policy
    #[must_use]
    pub fn new(existing: Vec<Record>) -> Self {
        Self::with_policy(existing, FreshestWins)
    }
}

impl<P: MergePolicy> Resolver<P> {
    /// Index `existing` under a custom policy
    ///
    /// Records are expected to be normalized already.
    #[must_use]
    pub fn with_policy(existing: Vec<Record>, policy: P) -> Self {
        let index = CatalogIndex::build(&existing);
        let stats = ResolveStats {
            baseline: existing.len(),
            ..ResolveStats::default()
        };
        debug!(
            entries = existing.len(),
            keys = index.len(),
            policy = policy.name(),
            "catalog indexed"
        );
        Self {
            catalog: existing,
            index,
            policy,
            stats,
        }
    }

    /// Fold one normalized record into the catalog
    pub fn resolve(&mut self, incoming: Record) -> Resolution {
        let keys = KeyTriple::of(&incoming);

        let resolution = match self.index.lookup(&keys) {
            Some(hit) => {
                let merged = self.policy.merge(&self.catalog[hit.position], &incoming);
                let merged_keys = KeyTriple::of(&merged);
                self.catalog[hit.position] = merged;
                self.index.register(&merged_keys, hit.position);
                debug!(
                    name = %incoming.name,
                    position = hit.position,
                    via = %hit.via,
                    "merged"
                );
                Resolution::Merged {
                    position: hit.position,
                    via: hit.via,
                }
            }
            None => {
                let position = self.catalog.len();
                self.catalog.push(incoming);
                self.index.register(&keys, position);
                debug!(name = %self.catalog[position].name, position, "added");
                Resolution::Added { position }
            }
        };

        self.stats.record(resolution);
        resolution
    }

    /// Fold every record in order
    pub fn resolve_all<I>(&mut self, incoming: I) -> Vec<Resolution>
    where
        I: IntoIterator<Item = Record>,
    {
        incoming.into_iter().map(|record| self.resolve(record)).collect()
    }

    /// Current catalog
    #[must_use]
    pub fn catalog(&self) -> &[Record] {
        &self.catalog
    }

    /// Current index
    #[must_use]
    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Counters so far
    #[must_use]
    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Finish the run
    #[must_use]
    pub fn finish(self) -> Resolved {
        info!(
            updated = self.stats.updated,
            added = self.stats.added,
            total = self.catalog.len(),
            "resolution complete"
        );
        Resolved {
            catalog: self.catalog,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn unmatched_records_are_appended() {
        let mut resolver = Resolver::new(vec![Record::new("NDSS 2026")]);
        let resolution = resolver.resolve(Record::new("CCS 2026"));
        assert_eq!(resolution, Resolution::Added { position: 1 });
        assert_eq!(resolver.catalog().len(), 2);
    }

    #[test]
    fn link_match_beats_name_match() {
        let baseline = vec![
            Record::new("Alpha 2026"),
            Record::new("Beta 2026").with(Field::Link, "https://beta.org"),
        ];
        let mut resolver = Resolver::new(baseline);
        let incoming = Record::new("Alpha 2026").with(Field::Link, "https://beta.org");
        assert_eq!(
            resolver.resolve(incoming),
            Resolution::Merged { position: 1, via: KeyKind::Link }
        );
        assert_eq!(resolver.catalog()[0].name, "Alpha 2026");
    }

    #[test]
    fn merged_record_registers_new_keys() {
        let mut resolver = Resolver::new(vec![Record::new("ICML")]);
        resolver.resolve(Record::new("ICML").with(Field::Link, "https://icml.cc"));

        let resolution = resolver.resolve(Record::new("Machine Learning Conf").with(Field::Link, "https://ICML.cc"));
        assert_eq!(resolution, Resolution::Merged { position: 0, via: KeyKind::Link });
        assert_eq!(resolver.catalog().len(), 1);
        assert_eq!(resolver.catalog()[0].name, "Machine Learning Conf");
    }

    #[test]
    fn added_records_are_matchable() {
        let mut resolver = Resolver::new(Vec::new());
        resolver.resolve(Record::new("FooConf 2026"));
        let resolution = resolver.resolve(Record::new("FooConf 2027"));
        assert_eq!(resolution, Resolution::Merged { position: 0, via: KeyKind::Series });
    }

    #[test]
    fn stats_count_decisions() {
        let mut resolver = Resolver::new(vec![Record::new("A 2026")]);
        resolver.resolve_all([
            Record::new("A 2026"),
            Record::new("A 2027"),
            Record::new("B"),
        ]);
        let resolved = resolver.finish();
        assert_eq!(
            resolved.stats,
            ResolveStats {
                baseline: 1,
                added: 1,
                updated: 2,
                via_link: 0,
                via_name: 1,
                via_series: 1,
            }
        );
        assert_eq!(resolved.catalog.len(), 2);
    }

    #[test]
    fn custom_policy_is_used() {
        #[derive(Debug)]
        struct KeepExisting;

        impl MergePolicy for KeepExisting {
            fn merge(&self, existing: &Record, _incoming: &Record) -> Record {
                existing.clone()
            }

            fn name(&self) -> &'static str {
                "keep-existing"
            }
        }

        let mut resolver = Resolver::with_policy(vec![Record::new("X")], KeepExisting);
        resolver.resolve(Record::new("X").with(Field::Location, "Rome"));
        assert_eq!(resolver.catalog()[0].location, "");
    }
}
