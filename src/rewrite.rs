//! In-place version substitution across target files.
//!
//! Every configured path is processed independently: a failure on one file
//! is recorded in the [RewriteReport] and the remaining files still run.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::bytes::{NoExpand, Regex};
use tracing::debug;

use crate::atomic::write_atomic;
use crate::error::VersionUpperError;

/// What happened to one target file
#[derive(Debug)]
pub enum FileOutcome {
    /// `occurrences` copies of the old version were replaced
    Changed { occurrences: usize },
    /// The old version does not occur; the file was not written
    Unchanged,
    /// The file could not be read, walked or written
    Failed(VersionUpperError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file results of a rewrite, in processing order
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub files: Vec<FileReport>,
}

impl RewriteReport {
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Changed { .. }))
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Unchanged))
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed(_)))
    }

    /// True when there was at least one target and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        !self.files.is_empty() && self.failed().count() == self.files.len()
    }
}

/// Replace every occurrence of `old_raw` with `new_raw` in each path.
///
/// Directories are walked recursively. Replacement is literal and
/// case-sensitive and works on raw bytes, so files that are not UTF-8 are
/// scanned like any other. Files are replaced atomically and only when their
/// content actually changes.
pub fn rewrite(old_raw: &str, new_raw: &str, paths: &[PathBuf]) -> RewriteReport {
    let pattern = literal(old_raw);
    process(paths, |path| rewrite_file(path, &pattern, old_raw, new_raw))
}

fn literal(text: &str) -> Regex {
    // An escaped literal is always a valid pattern.
    Regex::new(&regex::escape(text)).expect("escaped literal pattern")
}

/// Report what [rewrite] would do without writing anything.
pub fn preview(old_raw: &str, new_raw: &str, paths: &[PathBuf]) -> RewriteReport {
    let pattern = literal(old_raw);
    process(paths, |path| {
        let content = read_target(path)?;
        let occurrences = pattern.find_iter(&content).count();
        Ok(if occurrences == 0 || old_raw == new_raw {
            FileOutcome::Unchanged
        } else {
            FileOutcome::Changed { occurrences }
        })
    })
}

fn process<F>(paths: &[PathBuf], mut handle: F) -> RewriteReport
where
    F: FnMut(&Path) -> Result<FileOutcome, VersionUpperError>,
{
    let mut report = RewriteReport::default();
    let mut seen = HashSet::new();

    for target in expand_targets(paths) {
        let (path, outcome) = match target {
            Ok(path) => {
                if !seen.insert(path.clone()) {
                    continue;
                }
                let outcome = handle(&path).unwrap_or_else(FileOutcome::Failed);
                (path, outcome)
            }
            Err((path, err)) => (path, FileOutcome::Failed(err)),
        };

        match &outcome {
            FileOutcome::Changed { occurrences } => {
                debug!(path = %path.display(), occurrences, "updated version")
            }
            FileOutcome::Unchanged => debug!(path = %path.display(), "version not found"),
            FileOutcome::Failed(err) => {
                debug!(path = %path.display(), error = %err, "file not updated")
            }
        }
        report.files.push(FileReport { path, outcome });
    }

    report
}

type Target = Result<PathBuf, (PathBuf, VersionUpperError)>;

/// Expand configured entries into concrete files, walking directories.
fn expand_targets(paths: &[PathBuf]) -> Vec<Target> {
    let mut targets = Vec::new();
    for path in paths {
        if !path.is_dir() {
            targets.push(Ok(path.clone()));
            continue;
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().map_or(false, |ft| ft.is_file()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let io_err = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    targets.push(Err((
                        path.clone(),
                        VersionUpperError::file_access(path.clone(), io_err),
                    )));
                }
            }
        }
        files.sort();
        targets.extend(files.into_iter().map(Ok));
    }
    targets
}

fn read_target(path: &Path) -> Result<Vec<u8>, VersionUpperError> {
    fs::read(path).map_err(|e| VersionUpperError::file_access(path, e))
}

fn rewrite_file(
    path: &Path,
    pattern: &Regex,
    old_raw: &str,
    new_raw: &str,
) -> Result<FileOutcome, VersionUpperError> {
    let content = read_target(path)?;
    let occurrences = pattern.find_iter(&content).count();
    if occurrences == 0 || old_raw == new_raw {
        return Ok(FileOutcome::Unchanged);
    }

    let updated = pattern.replace_all(&content, NoExpand(new_raw.as_bytes()));
    write_atomic(path, &updated).map_err(|e| VersionUpperError::file_access(path, e))?;
    Ok(FileOutcome::Changed { occurrences })
}
