//! `csv-table-import` loads a directory of CSV exports into a SQLite database, once.
//!
//! Every `*.csv` file becomes its own table, named after the file and with one `TEXT`
//! column per header field. Successfully imported files are recorded in an import ledger
//! (`ImportedFiles`), so running the import again only picks up new files.
//!
//! The primary entrypoint is [`ingestion::run_import`]; [`ingestion::import_directory`]
//! does the same over a connection you already hold.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use csv_table_import::config::ImportConfig;
//! use csv_table_import::ingestion::{run_import, ImportOptions, StdOutObserver};
//!
//! # fn main() -> Result<(), csv_table_import::ImportError> {
//! let config = ImportConfig::from_env();
//! let opts = ImportOptions {
//!     observer: Some(Arc::new(StdOutObserver)),
//!     ..Default::default()
//! };
//! let summary = run_import(&config, &opts)?;
//! println!("imported={} failed={}", summary.imported(), summary.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Naming rules
//!
//! Table and column names go through [`sanitize::sanitize_identifier`]: every character
//! other than an ASCII letter, digit, or underscore becomes `_`. `2024 Q1 Sales!.csv`
//! with header `Amount ($)` lands in table `2024_Q1_Sales_`, column `Amount____`.
//! Names that end up empty, reserved, or colliding make that file fail.
//!
//! ## Modules
//!
//! - [`ingestion`]: discovery, CSV reading, orchestration, observers
//! - [`schema`]: header → table schema
//! - [`sanitize`]: identifier sanitization and validation
//! - [`store`]: SQLite connection, ledger, table materialization, row loading
//! - [`config`]: run configuration from the environment
//! - [`types`]: data model shared across modules
//! - [`error`]: the error type used across the pipeline

pub mod config;
pub mod error;
pub mod ingestion;
pub mod sanitize;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{ImportError, ImportResult};
