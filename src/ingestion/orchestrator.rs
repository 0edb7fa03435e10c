//! Directory import orchestration.
//!
//! Most callers should use [`run_import`], which opens the configured database, imports
//! every new `*.csv` file of the source directory, and releases the connection.
//!
//! - Each file is imported at most once: the ledger is consulted before any work.
//! - Each file runs in its own transaction (table creation, row load, ledger entry), so a
//!   failed file leaves neither rows nor a ledger entry behind.
//! - A failing file does not stop the run; only connectivity loss does.
//! - If an [`ImportObserver`] is provided, every outcome is reported to it.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::{debug, info_span};

use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::schema::build_schema;
use crate::store::{self, Materialized, ledger};
use crate::types::{FileOutcome, RunSummary, SkipReason, SourceFile, TableSchema};

use super::csv::read_csv_from_path;
use super::discovery::{DiscoveredEntry, discover};
use super::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};

/// Options controlling how a run reports its outcomes.
///
/// Use [`Default`] for a silent run.
#[derive(Clone)]
pub struct ImportOptions {
    /// Optional observer for status lines, logs, and alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Import `config.source_dir` into the database at `config.database`.
///
/// The connection is acquired once and dropped before returning, on success and on
/// every error path.
pub fn run_import(config: &ImportConfig, options: &ImportOptions) -> ImportResult<RunSummary> {
    let mut conn = store::connect(&config.database)?;
    import_directory(&mut conn, &config.source_dir, options)
}

/// Import every new candidate of `dir` through `conn`.
///
/// Returns the per-file outcomes. Fails only when the ledger cannot be prepared, `dir`
/// cannot be listed, or a file hits a fatal (connectivity) error.
pub fn import_directory(
    conn: &mut Connection,
    dir: impl AsRef<Path>,
    options: &ImportOptions,
) -> ImportResult<RunSummary> {
    ledger::ensure_exists(conn)?;

    let mut summary = RunSummary::default();
    for entry in discover(dir)? {
        match entry {
            DiscoveredEntry::NotACandidate(name) => {
                debug!(file = %name, "not a candidate");
                summary.push(
                    name,
                    FileOutcome::Skipped {
                        reason: SkipReason::NotACandidate,
                    },
                );
            }
            DiscoveredEntry::Candidate(file) => {
                let outcome = process_file(conn, &file, options)?;
                summary.push(file.name, outcome);
            }
        }
    }

    if let Some(obs) = options.observer.as_ref() {
        obs.on_run_finished(&summary);
    }
    Ok(summary)
}

/// Run one candidate through the pipeline and report its outcome.
///
/// Per-file errors become [`FileOutcome::Failed`]; fatal errors are reported and returned.
fn process_file(
    conn: &mut Connection,
    file: &SourceFile,
    options: &ImportOptions,
) -> ImportResult<FileOutcome> {
    let _span = info_span!("file", name = %file.name).entered();
    let ctx = ImportContext {
        file_name: file.name.clone(),
        path: file.path.clone(),
    };

    let result = match ledger::is_imported(conn, &file.name) {
        Ok(true) => Ok(None),
        Ok(false) => import_file(conn, file).map(Some),
        Err(e) => Err(e),
    };

    match result {
        Ok(None) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_skipped(&ctx);
            }
            Ok(FileOutcome::Skipped {
                reason: SkipReason::AlreadyImported,
            })
        }
        Ok(Some(stats)) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_imported(&ctx, &stats);
            }
            Ok(FileOutcome::Imported {
                table: stats.table,
                rows: stats.rows,
                created: stats.created,
            })
        }
        Err(e) => {
            if let Some(obs) = options.observer.as_ref() {
                let sev = e.severity();
                obs.on_failure(&ctx, sev, &e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, &e);
                }
            }
            if e.is_fatal() {
                return Err(e);
            }
            Ok(FileOutcome::Failed {
                reason: e.to_string(),
            })
        }
    }
}

/// Import a single file that is not yet in the ledger.
///
/// Table creation, row load, and the ledger entry commit together; on any error the
/// transaction is rolled back when it is dropped.
pub fn import_file(conn: &mut Connection, file: &SourceFile) -> ImportResult<ImportStats> {
    if file.size == 0 {
        return Err(ImportError::EmptyFile {
            path: file.path.clone(),
        });
    }

    let table = read_csv_from_path(&file.path)?;
    let schema = build_schema(&file.name, &table.header)?;
    debug!(
        table = %schema.table_name,
        columns = schema.column_count(),
        rows = table.row_count(),
        "derived schema"
    );

    let tx = conn.transaction()?;
    let materialized = store::ensure_table(&tx, &schema.table_name, &schema.columns)?;
    if materialized == Materialized::Existing {
        ensure_compatible(&tx, &schema)?;
    }
    let rows = store::load_rows(&tx, &schema.table_name, &schema.columns, &table.rows)?;
    ledger::mark_imported(&tx, &file.name)?;
    tx.commit()?;

    Ok(ImportStats {
        table: schema.table_name,
        rows,
        created: materialized == Materialized::Created,
    })
}

/// Fail unless the existing table has exactly the derived column set.
fn ensure_compatible(conn: &Connection, schema: &TableSchema) -> ImportResult<()> {
    let existing = store::table_columns(conn, &schema.table_name)?;
    let lower = |cols: &[String]| -> HashSet<String> {
        cols.iter().map(|c| c.to_ascii_lowercase()).collect()
    };
    if lower(&existing) != lower(&schema.columns) {
        return Err(ImportError::schema_mismatch(format!(
            "table '{}' already exists with columns {:?}, file header gives {:?}",
            schema.table_name, existing, schema.columns
        )));
    }
    Ok(())
}
