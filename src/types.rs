//! Core data model types for the import pipeline.
//!
//! A run discovers [`SourceFile`]s, reads each into a [`CsvTable`], derives a
//! [`TableSchema`], and records a [`FileOutcome`] per file in a [`RunSummary`].

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A directory entry considered by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name (ledger key).
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
}

/// Raw contents of a delimited text file: header plus text rows.
///
/// Values are kept exactly as read; empty fields stay empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Raw header names in file order.
    pub header: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Table definition derived from a file's header.
///
/// All columns are declared as unbounded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Sanitized table name (from the file stem).
    pub table_name: String,
    /// Sanitized column names in header order.
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub file_name: String,
    pub imported_at: NaiveDateTime,
}

/// Why a file was not imported without that being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The ledger already holds an entry for the file.
    AlreadyImported,
    /// The entry does not carry the recognized extension (or is not a regular file).
    NotACandidate,
}

/// Final state of a single file after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Imported {
        table: String,
        rows: usize,
        /// `false` when rows were appended to a table created by an earlier attempt.
        created: bool,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        reason: String,
    },
}

/// Outcome of one file, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Aggregate result of a run over a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn push(&mut self, file_name: impl Into<String>, outcome: FileOutcome) {
        self.files.push(FileReport {
            file_name: file_name.into(),
            outcome,
        });
    }

    pub fn imported(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Imported { .. }))
    }

    /// Files skipped because the ledger already had them.
    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::Skipped {
                    reason: SkipReason::AlreadyImported
                }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn not_candidates(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::Skipped {
                    reason: SkipReason::NotACandidate
                }
            )
        })
    }

    /// Look up the outcome recorded for `file_name`.
    pub fn outcome_of(&self, file_name: &str) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|r| r.file_name == file_name)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|r| pred(&r.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{FileOutcome, RunSummary, SkipReason};

    #[test]
    fn summary_counts_each_outcome_kind() {
        let mut summary = RunSummary::default();
        summary.push(
            "a.csv",
            FileOutcome::Imported {
                table: "a".to_string(),
                rows: 3,
                created: true,
            },
        );
        summary.push(
            "b.csv",
            FileOutcome::Skipped {
                reason: SkipReason::AlreadyImported,
            },
        );
        summary.push(
            "notes.txt",
            FileOutcome::Skipped {
                reason: SkipReason::NotACandidate,
            },
        );
        summary.push(
            "c.csv",
            FileOutcome::Failed {
                reason: "boom".to_string(),
            },
        );

        assert_eq!(summary.imported(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.not_candidates(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.outcome_of("c.csv"),
            Some(FileOutcome::Failed { .. })
        ));
        assert_eq!(summary.outcome_of("missing.csv"), None);
    }

    #[test]
    fn summary_serializes_with_status_tags() {
        let mut summary = RunSummary::default();
        summary.push(
            "orders.csv",
            FileOutcome::Imported {
                table: "orders".to_string(),
                rows: 1,
                created: true,
            },
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["files"][0]["file_name"], "orders.csv");
        assert_eq!(json["files"][0]["status"], "imported");
        assert_eq!(json["files"][0]["table"], "orders");
    }
}
