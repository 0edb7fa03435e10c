use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::error::ImportError;
use crate::types::RunSummary;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (a file failed).
    Error,
    /// Critical error (I/O or transport failures).
    Critical,
}

impl ImportSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ImportSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The file an event is about.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// File name (ledger key).
    pub file_name: String,
    pub path: PathBuf,
}

/// Stats reported on a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub table: String,
    pub rows: usize,
    /// Whether the table was created by this import.
    pub created: bool,
}

/// Observer interface for per-file outcomes.
///
/// Implementors print status lines, append to logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called when a file was imported and recorded in the ledger.
    fn on_imported(&self, _ctx: &ImportContext, _stats: &ImportStats) {}

    /// Called when a candidate was skipped because the ledger already has it.
    fn on_skipped(&self, _ctx: &ImportContext) {}

    /// Called when a file failed.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called, in addition to [`Self::on_failure`], when a failure meets the alert threshold.
    fn on_alert(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called once after the last file of a run.
    fn on_run_finished(&self, _summary: &RunSummary) {}
}

pub fn imported_message(ctx: &ImportContext, stats: &ImportStats) -> String {
    format!(
        "Imported '{}' into table '{}' ({} rows).",
        ctx.file_name, stats.table, stats.rows
    )
}

pub fn skipped_message(ctx: &ImportContext) -> String {
    format!("Skipping '{}': already imported.", ctx.file_name)
}

pub fn failure_message(ctx: &ImportContext, error: &ImportError) -> String {
    format!("Failed to import '{}': {}", ctx.file_name, error)
}

pub fn summary_message(summary: &RunSummary) -> String {
    format!(
        "Run finished: {} imported, {} skipped, {} failed.",
        summary.imported(),
        summary.skipped(),
        summary.failed()
    )
}

fn summary_severity(summary: &RunSummary) -> ImportSeverity {
    if summary.failed() > 0 {
        ImportSeverity::Warning
    } else {
        ImportSeverity::Info
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_imported(&self, ctx: &ImportContext, stats: &ImportStats) {
        for o in &self.observers {
            o.on_imported(ctx, stats);
        }
    }

    fn on_skipped(&self, ctx: &ImportContext) {
        for o in &self.observers {
            o.on_skipped(ctx);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_run_finished(&self, summary: &RunSummary) {
        for o in &self.observers {
            o.on_run_finished(summary);
        }
    }
}

/// Prints one status line per outcome to stdout; alerts go to stderr.
#[derive(Debug, Default)]
pub struct StdOutObserver;

impl ImportObserver for StdOutObserver {
    fn on_imported(&self, ctx: &ImportContext, stats: &ImportStats) {
        println!("{}", imported_message(ctx, stats));
    }

    fn on_skipped(&self, ctx: &ImportContext) {
        println!("{}", skipped_message(ctx));
    }

    fn on_failure(&self, ctx: &ImportContext, _severity: ImportSeverity, error: &ImportError) {
        println!("{}", failure_message(ctx, error));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!("[ALERT][{severity}] path={} err={}", ctx.path.display(), error);
    }

    fn on_run_finished(&self, summary: &RunSummary) {
        println!("{}", summary_message(summary));
    }
}

/// Appends `<timestamp> - <LEVEL> - <message>` lines to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Missing parent directories are created on first write. Writes are best-effort;
    /// failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Append one line at `severity`.
    pub fn log(&self, severity: ImportSeverity, message: &str) {
        let _guard = self.lock.lock().ok();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} - {} - {}", log_timestamp(), severity, message);
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_imported(&self, ctx: &ImportContext, stats: &ImportStats) {
        self.log(ImportSeverity::Info, &imported_message(ctx, stats));
    }

    fn on_skipped(&self, ctx: &ImportContext) {
        self.log(ImportSeverity::Info, &skipped_message(ctx));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.log(severity, &failure_message(ctx, error));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.log(severity, &format!("ALERT path={} err={}", ctx.path.display(), error));
    }

    fn on_run_finished(&self, summary: &RunSummary) {
        self.log(summary_severity(summary), &summary_message(summary));
    }
}

fn log_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string()
}
