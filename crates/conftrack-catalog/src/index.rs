//! Identity index over the working catalog
//!
//! Provides [`CatalogIndex`], a map from [`IdentityKey`] to catalog position.
//! Registration is first-writer-wins: once a key points at a record it is
//! never redirected.

use crate::keys::{IdentityKey, KeyKind, KeyTriple};
use crate::record::Record;
use std::collections::HashMap;

/// Result of a successful lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHit {
    /// Catalog position of the matched record
    pub position: usize,

    /// Key kind that produced the match
    pub via: KeyKind,
}

/// Map from identity key to catalog position
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    slots: HashMap<IdentityKey, usize>,
}

impl CatalogIndex {
    /// Create empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index an existing catalog in order
    ///
    /// When two records share a key, the earlier one keeps it.
    #[must_use]
    pub fn build(records: &[Record]) -> Self {
        let mut index = Self::new();
        for (position, record) in records.iter().enumerate() {
            index.register(&KeyTriple::of(record), position);
        }
        index
    }

    /// Point every unclaimed key at `position`
    ///
    /// Returns how many keys were newly claimed.
    pub fn register(&mut self, keys: &KeyTriple, position: usize) -> usize {
        keys.keys()
            .filter(|key| self.claim((*key).clone(), position))
            .count()
    }

    /// Claim a single key; returns false if it was already taken
    pub fn claim(&mut self, key: IdentityKey, position: usize) -> bool {
        let mut claimed = false;
        self.slots.entry(key).or_insert_with(|| {
            claimed = true;
            position
        });
        claimed
    }

    /// Find the first key that is already known, in priority order
    #[must_use]
    pub fn lookup(&self, keys: &KeyTriple) -> Option<IndexHit> {
        keys.keys().find_map(|key| {
            self.slots.get(key).map(|&position| IndexHit {
                position,
                via: key.kind(),
            })
        })
    }

    /// Position registered for one key
    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<usize> {
        self.slots.get(key).copied()
    }

    /// Number of registered keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no key is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn key(kind: KeyKind, value: &str) -> IdentityKey {
        IdentityKey::new(kind, value).unwrap()
    }

    #[test]
    fn build_keeps_first_writer() {
        let records = vec![
            Record::new("IEEE ICC 2026"),
            Record::new("IEEE ICC 2027"),
            Record::new("IEEE ICC 2026").with(Field::Link, "https://icc.org"),
        ];
        let index = CatalogIndex::build(&records);
        assert_eq!(index.get(&key(KeyKind::Series, "ieee icc")), Some(0));
        assert_eq!(index.get(&key(KeyKind::ExactName, "ieee icc 2026")), Some(0));
        assert_eq!(index.get(&key(KeyKind::ExactName, "ieee icc 2027")), Some(1));
        assert_eq!(index.get(&key(KeyKind::Link, "https://icc.org")), Some(2));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn lookup_follows_priority() {
        let records = vec![
            Record::new("Alpha 2026"),
            Record::new("Beta").with(Field::Link, "https://shared.org"),
        ];
        let index = CatalogIndex::build(&records);

        let probe = Record::new("Alpha 2026").with(Field::Link, "https://SHARED.org");
        let hit = index.lookup(&KeyTriple::of(&probe)).unwrap();
        assert_eq!(hit, IndexHit { position: 1, via: KeyKind::Link });

        let probe = Record::new("Alpha 2027");
        let hit = index.lookup(&KeyTriple::of(&probe)).unwrap();
        assert_eq!(hit, IndexHit { position: 0, via: KeyKind::Series });

        assert!(index.lookup(&KeyTriple::of(&Record::new("Gamma"))).is_none());
    }

    #[test]
    fn register_counts_new_claims() {
        let mut index = CatalogIndex::new();
        assert!(index.is_empty());
        let keys = KeyTriple::of(&Record::new("NDSS 2027"));
        assert_eq!(index.register(&keys, 0), 2);
        assert_eq!(index.register(&keys, 5), 0);
        assert_eq!(index.get(&key(KeyKind::ExactName, "ndss 2027")), Some(0));
    }
}
