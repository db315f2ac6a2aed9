//! One update run: preflight, load, fetch, update, write

use crate::config::RunConfig;
use anyhow::{Context, Result};
use conftrack_catalog::{load_catalog, preflight, update, write_catalog, ResolveStats};
use conftrack_sources::{
    collect_all, CcfDeadlines, CsaLab, EasyChair, EdasWatchlist, Source, SourceResult,
};
use tracing::{info, warn};

/// What a run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Sources that were enabled
    pub sources: usize,

    /// Raw records fetched across sources
    pub fetched: usize,

    /// Resolution counters
    pub stats: ResolveStats,

    /// Entries written
    pub total: usize,
}

/// Build the enabled sources, in fetch order
///
/// A source whose client or watchlist cannot be set up is logged and left
/// out; the remaining sources are still built.
#[must_use]
pub fn build_sources(config: &RunConfig) -> Vec<Box<dyn Source>> {
    let mut sources: Vec<Box<dyn Source>> = Vec::new();

    if config.csalab {
        push_built(&mut sources, "csalab", CsaLab::new(config.timeout));
    }
    if config.easychair {
        push_built(&mut sources, "easychair", EasyChair::new(config.timeout));
    }
    match EdasWatchlist::from_file(&config.edas_watchlist, config.timeout) {
        Ok(Some(edas)) => sources.push(Box::new(edas)),
        Ok(None) => {}
        Err(e) => warn!(
            source = "edas",
            path = %config.edas_watchlist.display(),
            error = %e,
            "watchlist unusable, skipping source"
        ),
    }
    if config.ccfddl {
        push_built(&mut sources, "ccfddl", CcfDeadlines::new(config.ccf_options()));
    }
    sources
}

fn push_built<S>(sources: &mut Vec<Box<dyn Source>>, name: &str, built: SourceResult<S>)
where
    S: Source + 'static,
{
    match built {
        Ok(source) => sources.push(Box::new(source)),
        Err(e) => warn!(source = name, error = %e, "could not set up source, skipping"),
    }
}

/// Run with the sources named by `config`
///
/// # Errors
///
/// See [`run_with_sources`].
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    run_with_sources(config, build_sources(config))
}

/// Run with an explicit source list
///
/// Source failures are logged and skipped; only pattern, baseline and output
/// errors abort the run, and they abort it before the output is touched.
///
/// # Errors
///
/// Invalid built-in patterns, an unreadable or malformed baseline, and an
/// unwritable output path.
pub fn run_with_sources(
    config: &RunConfig,
    mut sources: Vec<Box<dyn Source>>,
) -> Result<RunSummary> {
    preflight().context("built-in patterns")?;

    let baseline = load_catalog(&config.input)
        .with_context(|| format!("loading baseline {}", config.input.display()))?;

    let incoming = collect_all(&mut sources);
    let fetched = incoming.len();
    let outcome = update(baseline, incoming);

    write_catalog(&config.output, &outcome.catalog)
        .with_context(|| format!("writing catalog {}", config.output.display()))?;

    let summary = RunSummary {
        sources: sources.len(),
        fetched,
        stats: outcome.stats,
        total: outcome.catalog.len(),
    };
    info!(
        sources = summary.sources,
        fetched = summary.fetched,
        updated = summary.stats.updated,
        added = summary.stats.added,
        total = summary.total,
        output = %config.output.display(),
        "run complete"
    );
    Ok(summary)
}
