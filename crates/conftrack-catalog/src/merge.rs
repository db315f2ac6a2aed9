//! Merge policy trait and the default field-precedence policy
//!
//! Provides the [`MergePolicy`] trait used by the resolver to fold an
//! incoming record into the catalog entry it matched.

use crate::canonical::normalize_subjects;
use crate::record::{Field, Record};

/// Field-precedence rules for combining two records that refer to the same
/// conference
///
/// Implementations must never erase information: a non-empty field of
/// `existing` may only be replaced by another non-empty value.
pub trait MergePolicy: std::fmt::Debug {
    /// Combine `existing` with a fresher `incoming` record
    ///
    /// Both inputs are normalized.
    fn merge(&self, existing: &Record, incoming: &Record) -> Record;

    /// Policy name (for logs)
    fn name(&self) -> &'static str;
}

/// Default policy: newer non-empty values refresh dates and location
///
/// - name: the longer of the two (by character count) wins
/// - link: the first non-empty link is kept
/// - refreshable fields: any non-empty incoming value overwrites
/// - subjects: canonical union in first-seen order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreshestWins;

impl MergePolicy for FreshestWins {
    fn merge(&self, existing: &Record, incoming: &Record) -> Record {
        let mut merged = existing.clone();

        if incoming.name.chars().count() > existing.name.chars().count() {
            merged.name.clone_from(&incoming.name);
        }

        if existing.link.is_empty() && !incoming.link.is_empty() {
            merged.link.clone_from(&incoming.link);
        }

        for field in Field::REFRESHABLE {
            let fresh = incoming.text(field);
            if !fresh.is_empty() {
                *merged.text_mut(field) = fresh.to_string();
            }
        }

        merged.subjects = normalize_subjects(existing.subjects.iter().chain(&incoming.subjects));
        merged
    }

    fn name(&self) -> &'static str {
        "freshest-wins"
    }
}
