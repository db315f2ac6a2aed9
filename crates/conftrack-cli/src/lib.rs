//! conftrack command line
//!
//! Loads the catalog, runs the enabled feeds, merges their records and
//! writes the catalog back. The binary is a thin shell over [`parse_args`]
//! and [`run`].

#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod run;

// Re-exports
pub use config::{command, parse_args, RunConfig};
pub use logging::init_tracing;
pub use run::{build_sources, run, run_with_sources, RunSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
