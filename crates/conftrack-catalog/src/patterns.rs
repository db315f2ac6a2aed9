//! Text patterns shared by canonicalization and identity keys
//!
//! Every pattern is declared once as a source string; [`preflight`] compiles
//! the full set up front so a bad pattern aborts the run before any file is
//! touched. The lazily compiled statics reuse the same sources.

use crate::error::{CatalogError, CatalogResult};
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const CCF_WRAPPED_SRC: &str = r"(?i)^CCF\s+\w+\s*\((.+)\)$";
pub(crate) const CCF_PREFIX_SRC: &str = r"(?i)^CCF\s+\w+";
pub(crate) const TRAILING_PAREN_SRC: &str = r"\(([^()]+)\)\s*$";
pub(crate) const STRIKE_SRC: &str = r"(?i)</?strike>";
pub(crate) const PAREN_NOTE_SRC: &str = r"\(.*?\)";
pub(crate) const IN_DAYS_SRC: &str = r"(?i)in\s+\d+\s+days";
pub(crate) const CLOCK_TIME_SRC: &str = r"(?i);?\s*\d{1,2}:\d{2}\s*(AM|PM)";
pub(crate) const UTC_OFFSET_SRC: &str = r"^UTC([+-])(\d{1,2})$";
pub(crate) const YEAR_SRC: &str = r"\b(19|20)\d{2}\b";
pub(crate) const CYCLE_SRC: &str = r"(?i)(?:[-\x{2013}\x{2014}]?\s*)?cycle\s*(?:\d+|spring|fall)\b";
pub(crate) const DASHES_SRC: &str = r"[\x{2010}-\x{2014}\x{2212}]";
pub(crate) const NON_KEY_SRC: &str = r"[^a-z0-9\- ]+";

const ALL_SOURCES: [&str; 12] = [
    CCF_WRAPPED_SRC,
    CCF_PREFIX_SRC,
    TRAILING_PAREN_SRC,
    STRIKE_SRC,
    PAREN_NOTE_SRC,
    IN_DAYS_SRC,
    CLOCK_TIME_SRC,
    UTC_OFFSET_SRC,
    YEAR_SRC,
    CYCLE_SRC,
    DASHES_SRC,
    NON_KEY_SRC,
];

/// Compile every built-in pattern once
///
/// # Errors
///
/// Returns [`CatalogError::Pattern`] naming the first pattern that fails.
pub fn preflight() -> CatalogResult<()> {
    for source in ALL_SOURCES {
        Regex::new(source).map_err(|e| CatalogError::pattern(source, e))?;
    }
    Ok(())
}

fn compile(source: &'static str) -> Regex {
    // Sources are covered by `preflight` and its unit test.
    Regex::new(source).unwrap_or_else(|e| panic!("built-in pattern {source:?} is invalid: {e}"))
}

pub(crate) static CCF_WRAPPED: Lazy<Regex> = Lazy::new(|| compile(CCF_WRAPPED_SRC));
pub(crate) static CCF_PREFIX: Lazy<Regex> = Lazy::new(|| compile(CCF_PREFIX_SRC));
pub(crate) static TRAILING_PAREN: Lazy<Regex> = Lazy::new(|| compile(TRAILING_PAREN_SRC));
pub(crate) static STRIKE: Lazy<Regex> = Lazy::new(|| compile(STRIKE_SRC));
pub(crate) static PAREN_NOTE: Lazy<Regex> = Lazy::new(|| compile(PAREN_NOTE_SRC));
pub(crate) static IN_DAYS: Lazy<Regex> = Lazy::new(|| compile(IN_DAYS_SRC));
pub(crate) static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| compile(CLOCK_TIME_SRC));
pub(crate) static UTC_OFFSET: Lazy<Regex> = Lazy::new(|| compile(UTC_OFFSET_SRC));
pub(crate) static YEAR: Lazy<Regex> = Lazy::new(|| compile(YEAR_SRC));
pub(crate) static CYCLE: Lazy<Regex> = Lazy::new(|| compile(CYCLE_SRC));
pub(crate) static DASHES: Lazy<Regex> = Lazy::new(|| compile(DASHES_SRC));
pub(crate) static NON_KEY: Lazy<Regex> = Lazy::new(|| compile(NON_KEY_SRC));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        preflight().unwrap();
    }
}
