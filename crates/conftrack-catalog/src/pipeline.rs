//! Update pipeline: normalize, resolve, re-normalize, order

use crate::canonical::normalize;
use crate::merge::{FreshestWins, MergePolicy};
use crate::order::ordered;
use crate::record::{RawRecord, Record};
use crate::resolve::{ResolveStats, Resolver};
use tracing::info;

/// Final catalog of one update run
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Merged, canonical, ordered catalog
    pub catalog: Vec<Record>,

    /// Resolution counters
    pub stats: ResolveStats,
}

/// Merge `incoming` into `baseline` under the default policy
#[must_use]
pub fn update<I>(baseline: Vec<Record>, incoming: I) -> UpdateOutcome
where
    I: IntoIterator<Item = RawRecord>,
{
    update_with_policy(baseline, incoming, FreshestWins)
}

/// Merge `incoming` into `baseline` under `policy`
#[must_use]
pub fn update_with_policy<I, P>(baseline: Vec<Record>, incoming: I, policy: P) -> UpdateOutcome
where
    I: IntoIterator<Item = RawRecord>,
    P: MergePolicy,
{
    let baseline = baseline.iter().map(Record::normalized).collect();
    let mut resolver = Resolver::with_policy(baseline, policy);
    for raw in incoming {
        resolver.resolve(normalize(&raw));
    }

    let resolved = resolver.finish();
    let catalog = ordered(resolved.catalog.iter().map(Record::normalized).collect());
    info!(
        baseline = resolved.stats.baseline,
        updated = resolved.stats.updated,
        added = resolved.stats.added,
        total = catalog.len(),
        "catalog updated"
    );

    UpdateOutcome {
        catalog,
        stats: resolved.stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, UNCATEGORIZED};

    #[test]
    fn empty_inputs_give_empty_catalog() {
        let outcome = update(Vec::new(), Vec::new());
        assert!(outcome.catalog.is_empty());
        assert_eq!(outcome.stats, ResolveStats::default());
    }

    #[test]
    fn baseline_is_normalized_and_ordered() {
        let baseline = vec![
            Record::new("  Zeta  ").with_subjects(Vec::<String>::new()),
            Record::new("Alpha").with(Field::SubmissionDeadline, "March 3, 2026"),
        ];
        let outcome = update(baseline, Vec::new());
        assert_eq!(outcome.catalog[0].name, "Alpha");
        assert_eq!(outcome.catalog[0].submission_deadline, "Mar 03 2026");
        assert_eq!(outcome.catalog[1].name, "Zeta");
        assert_eq!(outcome.catalog[1].subjects, vec![UNCATEGORIZED]);
    }

    #[test]
    fn incoming_raw_records_merge() {
        let baseline = vec![Record::new("IEEE ICC 2026").with(Field::Location, "Glasgow")];
        let incoming = vec![
            RawRecord::named("IEEE  ICC 2026").with(Field::SubmissionDeadline, "Oct 10, 2025"),
            RawRecord::named("IEEE GLOBECOM 2026"),
        ];
        let outcome = update(baseline, incoming);
        assert_eq!(outcome.stats.updated, 1);
        assert_eq!(outcome.stats.added, 1);
        assert_eq!(outcome.catalog[0].name, "IEEE ICC 2026");
        assert_eq!(outcome.catalog[0].location, "Glasgow");
        assert_eq!(outcome.catalog[0].submission_deadline, "Oct 10 2025");
    }
}
