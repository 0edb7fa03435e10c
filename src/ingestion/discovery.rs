//! Source file discovery.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ImportResult;
use crate::types::SourceFile;

/// Recognized delimited-text extension (matched case-insensitively).
pub const CSV_EXTENSION: &str = ".csv";

/// A directory entry as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveredEntry {
    Candidate(SourceFile),
    /// Anything else; carries the entry name.
    NotACandidate(String),
}

/// Whether `file_name` carries the recognized extension.
pub fn is_candidate_name(file_name: &str) -> bool {
    file_name
        .len()
        .checked_sub(CSV_EXTENSION.len())
        .and_then(|start| file_name.get(start..))
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
}

/// List the immediate entries of `dir` in listing order (unsorted).
///
/// Candidates are regular files (symlinks followed) whose names end in `.csv`.
/// Entries that cannot be inspected are logged and left out. Fails only when `dir`
/// itself cannot be read.
pub fn discover(dir: impl AsRef<Path>) -> ImportResult<Vec<DiscoveredEntry>> {
    let dir = dir.as_ref();
    // Surface a missing or unreadable root as an error instead of an empty listing.
    std::fs::read_dir(dir)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            entries.push(DiscoveredEntry::NotACandidate(
                entry.file_name().to_string_lossy().into_owned(),
            ));
            continue;
        };

        if !entry.file_type().is_file() || !is_candidate_name(&name) {
            entries.push(DiscoveredEntry::NotACandidate(name));
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(file = %name, error = %err, "skipping entry without metadata");
                continue;
            }
        };
        entries.push(DiscoveredEntry::Candidate(SourceFile {
            name,
            path: entry.into_path(),
            size,
        }));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::is_candidate_name;

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_candidate_name("orders.csv"));
        assert!(is_candidate_name("ORDERS.CSV"));
        assert!(is_candidate_name("Mixed.CsV"));
        assert!(is_candidate_name(".csv"));
    }

    #[test]
    fn other_names_are_not_candidates() {
        assert!(!is_candidate_name("orders.tsv"));
        assert!(!is_candidate_name("orders.csv.bak"));
        assert!(!is_candidate_name("csv"));
        assert!(!is_candidate_name("ordercsv"));
        assert!(!is_candidate_name(""));
        assert!(!is_candidate_name("données.txt"));
    }
}
