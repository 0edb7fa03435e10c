//! Directory ingestion: discovery, CSV reading, orchestration, and outcome reporting.
//!
//! Most callers should use [`run_import`] (from [`orchestrator`]) which:
//!
//! - lists the source directory and keeps `*.csv` files (case-insensitive)
//! - skips files already recorded in the import ledger
//! - imports each remaining file into its own text-typed table, one transaction per file
//! - reports imported/skipped/failed outcomes to an optional [`ImportObserver`]

pub mod csv;
pub mod discovery;
pub mod observability;
pub mod orchestrator;

pub use discovery::{DiscoveredEntry, discover, is_candidate_name};
pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats,
    StdOutObserver,
};
pub use orchestrator::{ImportOptions, import_directory, import_file, run_import};
