//! Identity keys
//!
//! A record is identified by up to three keys, tried in priority order:
//! its official link, its exact name and its series name (the name with
//! years and cycle markers removed). Empty keys are absent.

use crate::canonical::collapse_ws;
use crate::patterns::{CYCLE, DASHES, NON_KEY, YEAR};
use crate::record::Record;
use std::fmt::{self, Display, Formatter};

/// Kind of identity key, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    /// Lowercased official link
    Link,

    /// Normalized full name
    ExactName,

    /// Normalized name without years or cycle markers
    Series,
}

impl KeyKind {
    /// Namespace prefix used when rendering keys
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Link => "L:",
            Self::ExactName => "N:",
            Self::Series => "S:",
        }
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Link => "link",
            Self::ExactName => "name",
            Self::Series => "series",
        })
    }
}

/// A namespaced identity key
///
/// Keys of different kinds never compare equal even when their values do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    kind: KeyKind,
    value: String,
}

impl IdentityKey {
    /// Create key; returns `None` for an empty value
    #[must_use]
    pub fn new(kind: KeyKind, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self { kind, value })
        }
    }

    /// Key kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Normalized key value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.value)
    }
}

/// Link key: trimmed and lowercased
#[must_use]
pub fn link_key(link: &str) -> String {
    link.trim().to_lowercase()
}

/// Exact-name key
///
/// Lowercase, whitespace collapsed, Unicode dashes folded to `-`, then
/// everything outside `[a-z0-9- ]` dropped.
#[must_use]
pub fn exact_name_key(name: &str) -> String {
    let lowered = collapse_ws(&name.to_lowercase());
    let dashed = DASHES.replace_all(&lowered, "-");
    NON_KEY.replace_all(&dashed, "").trim().to_string()
}

/// Series key: [`exact_name_key`] after removing years and cycle markers
#[must_use]
pub fn series_key(name: &str) -> String {
    let without_years = YEAR.replace_all(name, "");
    let without_cycles = CYCLE.replace_all(&without_years, "");
    exact_name_key(&without_cycles)
}

/// The identity keys of one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTriple {
    /// Link key, if the record has a link
    pub link: Option<IdentityKey>,

    /// Exact-name key
    pub exact: Option<IdentityKey>,

    /// Series key
    pub series: Option<IdentityKey>,
}

impl KeyTriple {
    /// Derive keys from a record
    #[must_use]
    pub fn of(record: &Record) -> Self {
        Self {
            link: IdentityKey::new(KeyKind::Link, link_key(&record.link)),
            exact: IdentityKey::new(KeyKind::ExactName, exact_name_key(&record.name)),
            series: IdentityKey::new(KeyKind::Series, series_key(&record.name)),
        }
    }

    /// Present keys in priority order
    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        [&self.link, &self.exact, &self.series]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    /// True if no key could be derived
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.exact.is_none() && self.series.is_none()
    }
}
