use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Generated directories and files removed by `clean` when nothing is configured.
pub const DEFAULT_TARGETS: &[&str] = &[
    "bazel-bin",
    "bazel-out",
    "bazel-testlogs",
    "bazel-org_realityforge_shooter",
    "DerivedDataCache",
    "Intermediate",
    "Saved",
    "cmake-build-debug",
    "Binaries",
];

#[derive(Debug)]
pub enum CleanOutcome {
    DeletedFile,
    DeletedDirectory,
    Missing,
    /// Exists but is neither a regular file nor a directory.
    Invalid,
    FileError(io::Error),
    DirectoryError(io::Error),
}

/// What happened to one target. `path` is displayed as given, relative to the clean root.
#[derive(Debug)]
pub struct CleanReport {
    pub path: String,
    pub outcome: CleanOutcome,
}

impl CleanReport {
    pub fn is_error(&self) -> bool {
        matches!(
            self.outcome,
            CleanOutcome::FileError(_) | CleanOutcome::DirectoryError(_)
        )
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.outcome {
            CleanOutcome::DeletedFile => write!(f, "Deleted file: {}", path),
            CleanOutcome::DeletedDirectory => write!(f, "Deleted directory: {}", path),
            CleanOutcome::Missing => write!(f, "Path does not exist: {}", path),
            CleanOutcome::Invalid => write!(f, "Invalid path: {}", path),
            CleanOutcome::FileError(e) => write!(f, "Error deleting file {}: {}", path, e),
            CleanOutcome::DirectoryError(e) => write!(f, "Error deleting directory {}: {}", path, e),
        }
    }
}

/// Removes every target under `root`, one report per removed or missing entry.
///
/// Per-entry failures end up in the reports. Only a bad glob pattern or an
/// unreadable `root` fails the whole call.
pub fn clean(root: &Path, targets: &[String]) -> Result<Vec<CleanReport>> {
    let mut reports = Vec::new();
    for target in targets {
        if is_pattern(target) {
            let matcher = Glob::new(target)
                .with_context(|| format!("Invalid clean target pattern: {}", target))?
                .compile_matcher();
            let matches = expand(root, &matcher)?;
            if matches.is_empty() {
                reports.push(CleanReport {
                    path: target.clone(),
                    outcome: CleanOutcome::Missing,
                });
            }
            for name in matches {
                let outcome = remove(&root.join(&name));
                reports.push(CleanReport { path: name, outcome });
            }
        } else {
            reports.push(CleanReport {
                path: target.clone(),
                outcome: remove(&root.join(target)),
            });
        }
    }
    Ok(reports)
}

fn is_pattern(target: &str) -> bool {
    target.contains(['*', '?', '['])
}

/// Entry names directly under `root` matching `matcher`, sorted for a stable report.
fn expand(root: &Path, matcher: &GlobMatcher) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))? {
        let entry = entry.with_context(|| format!("Failed to read {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if matcher.is_match(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn remove(path: &Path) -> CleanOutcome {
    // symlink_metadata so a link is removed rather than followed.
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return CleanOutcome::Missing,
        Err(e) => return CleanOutcome::FileError(e),
    };
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        match fs::remove_dir_all(path) {
            Ok(()) => CleanOutcome::DeletedDirectory,
            Err(e) => CleanOutcome::DirectoryError(e),
        }
    } else if file_type.is_file() || file_type.is_symlink() {
        match fs::remove_file(path) {
            Ok(()) => CleanOutcome::DeletedFile,
            Err(e) => CleanOutcome::FileError(e),
        }
    } else {
        CleanOutcome::Invalid
    }
}
