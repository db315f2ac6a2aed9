//! conftrack catalog core
//!
//! Entity resolution and merging for a conference catalog.
//!
//! # Overview
//!
//! - **canonical**: whitespace, date, timezone and subject normalization
//! - **keys**: link, exact-name and series identity keys
//! - **index**: first-writer-wins map from identity key to catalog position
//! - **merge**: the [`MergePolicy`] trait and the default [`FreshestWins`]
//! - **resolve**: the [`Resolver`] fold over incoming records
//! - **order**: presentation order by submission deadline
//! - **pipeline**: the whole update as one call
//! - **store**: catalog JSON file access
//!
//! # Example
//!
//! ```rust
//! use conftrack_catalog::{update, Field, RawRecord, Record};
//!
//! let baseline = vec![Record::new("ICML")];
//! let incoming = vec![RawRecord::named("ICML 2026")
//!     .with(Field::Link, "https://icml.cc")
//!     .with(Field::SubmissionDeadline, "Jan 30, 2026 (AoE)")];
//!
//! let outcome = update(baseline, incoming);
//! assert_eq!(outcome.catalog.len(), 1);
//! assert_eq!(outcome.catalog[0].name, "ICML 2026");
//! assert_eq!(outcome.catalog[0].submission_deadline, "Jan 30 2026");
//! ```

#![warn(missing_docs)]

pub mod canonical;
pub mod error;
pub mod index;
pub mod keys;
pub mod merge;
pub mod order;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod store;

mod patterns;

// Re-exports
pub use canonical::{normalize, preflight};
pub use error::{CatalogError, CatalogResult, StoreError};
pub use index::{CatalogIndex, IndexHit};
pub use keys::{IdentityKey, KeyKind, KeyTriple};
pub use merge::{FreshestWins, MergePolicy};
pub use order::{ordered, sort_catalog};
pub use pipeline::{update, update_with_policy, UpdateOutcome};
pub use record::{Field, RawRecord, RawValue, Record, UNCATEGORIZED};
pub use resolve::{Resolution, ResolveStats, Resolved, Resolver};
pub use store::{load_catalog, write_catalog, DEFAULT_CATALOG_PATH};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for catalog operations
    pub use crate::{
        load_catalog, normalize, update, write_catalog, CatalogError, Field, FreshestWins,
        KeyKind, MergePolicy, RawRecord, RawValue, Record, Resolution, Resolver, StoreError,
        UpdateOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
