//! Git queries that produce candidate paths.

use crate::app::error::ToolError;
use crate::app::models::CandidatePath;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Listings return paths relative to `toplevel()`.
pub trait VersionControl {
    fn toplevel(&self) -> &Path;

    /// Every file tracked at `reference`.
    fn tracked_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>>;

    /// Files staged in the index that differ from `reference`, deletions excluded.
    fn staged_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>>;

    /// Files in the working tree that differ from `reference`, deletions excluded.
    fn changed_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>>;
}

pub struct Git {
    toplevel: PathBuf,
}

impl Git {
    /// Finds the enclosing repository of `dir` with `git rev-parse --show-toplevel`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let output = run_git(dir, &["rev-parse", "--show-toplevel"])
            .context("Failed to locate the git repository")?;
        let reported = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        // Same form as a canonicalized working directory, so the two can be diffed.
        let toplevel = dunce::canonicalize(&reported).unwrap_or(reported);
        log::debug!("Git top-level: {}", toplevel.display());
        Ok(Self { toplevel })
    }

    fn list(&self, args: &[&str], paths: &[String]) -> Result<Vec<CandidatePath>> {
        let mut full_args: Vec<&str> = args.to_vec();
        full_args.extend(paths.iter().map(String::as_str));
        let output = run_git(&self.toplevel, &full_args)?;
        Ok(parse_listing(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl VersionControl for Git {
    fn toplevel(&self) -> &Path {
        &self.toplevel
    }

    fn tracked_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>> {
        self.list(&["ls-tree", "-r", "--name-only", reference], paths)
            .context("Failed to list tracked files")
    }

    fn staged_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>> {
        self.list(&["diff-index", "--cached", "--name-only", "--diff-filter=d", reference], paths)
            .context("Failed to list staged files")
    }

    fn changed_files(&self, reference: &str, paths: &[String]) -> Result<Vec<CandidatePath>> {
        self.list(&["diff", "--name-only", "--diff-filter=d", reference], paths)
            .context("Failed to list changed files")
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<Output, ToolError> {
    let command = format!("git {}", args.join(" "));
    log::debug!("Running `{}` in {}", command, dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| ToolError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::CommandFailed {
            command,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Newline-delimited git output to candidate paths, skipping blank lines.
pub fn parse_listing(stdout: &str) -> Vec<CandidatePath> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(CandidatePath::new)
        .collect()
}
