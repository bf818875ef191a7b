// Declare modules
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod selector;
pub mod vcs;

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use self::cli::{CleanArgs, Cli, Commands, FormatArgs};
use self::config::{load_config_file, resolve_clean_targets, resolve_format_config};
use self::formatter::ClangFormat;
use self::models::{normalize_separators, CandidatePath, SelectionMode};
use self::selector::{rules_for_root, scope_to_root, select};
use self::vcs::{Git, VersionControl};

/// Dispatches the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Commands::FormatAll(args) => format(SelectionMode::FullTree, args, config_path.as_deref()),
        Commands::FormatChanged(args) => {
            format(SelectionMode::ChangedSet, args, config_path.as_deref())
        }
        Commands::Clean(args) => clean(args, config_path.as_deref()),
    }
}

fn format(mode: SelectionMode, args: FormatArgs, config_path: Option<&Path>) -> Result<()> {
    // 1. Locate the repository
    let current_dir = current_dir()?;
    let git = Git::discover(&current_dir)?;

    // 2. Resolve configuration
    let file = load_config_file(config_path, git.toplevel())?;
    let config = resolve_format_config(args, file);
    log::info!("Performing source code formatting. Files: {:?}", config.paths);

    let root = match &config.root {
        Some(root) => normalize_separators(root).trim_matches('/').to_string(),
        None => relative_root(&current_dir, git.toplevel()),
    };
    let paths = relative_paths(&config.paths, &current_dir, git.toplevel());

    // 3. List and select
    let candidates = collect_candidates(&git, mode, &config.reference, &paths)?;
    log::debug!("{} candidate paths, sub-project root {:?}", candidates.len(), root);
    let cwd = git.toplevel().join(&root);
    let candidates = existing_only(scope_to_root(candidates, &root), &cwd);
    let selection = select(&candidates, &rules_for_root(&config.rules, &root));

    if selection.is_empty() {
        log::warn!("No files matched the inclusion rules.");
        return Ok(());
    }
    log::debug!("Selected {} files", selection.len());

    // 4. Format from the sub-project root, where the selected paths are relative
    let clang_format = ClangFormat::new(config.formatter.as_str());
    let outcome = formatter::apply(&clang_format, &selection, &cwd, config.check)?;
    if !outcome.failed.is_empty() {
        log::warn!("{} file(s) could not be formatted", outcome.failed.len());
    }

    if config.verbose {
        println!("{}", formatter::report(&outcome));
    }
    Ok(())
}

fn clean(args: CleanArgs, config_path: Option<&Path>) -> Result<()> {
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => current_dir()?,
    };
    let file = load_config_file(config_path, &dir)?;
    let targets = resolve_clean_targets(args, file);

    let reports = cleaner::clean(&dir, &targets)?;
    for report in &reports {
        println!("{}", report);
    }

    let errors = reports.iter().filter(|r| r.is_error()).count();
    if errors > 0 {
        log::warn!("{} entries could not be deleted", errors);
    }
    Ok(())
}

fn current_dir() -> Result<PathBuf> {
    let dir = env::current_dir().context("Failed to get current directory")?;
    // Same form as the git top-level: symlinks resolved, no `\\?\` prefix.
    Ok(dunce::canonicalize(&dir).unwrap_or(dir))
}

/// Drops candidates with no file under `cwd`. Listings against a revision
/// still name files that were since deleted from the working tree.
pub fn existing_only(candidates: Vec<CandidatePath>, cwd: &Path) -> Vec<CandidatePath> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let exists = cwd.join(candidate.as_str()).is_file();
            if !exists {
                log::debug!("Skipping {}: not in the working tree", candidate);
            }
            exists
        })
        .collect()
}

/// Lists candidates for `mode`. Full-tree also picks up files staged but not yet committed.
pub fn collect_candidates(
    vcs: &dyn VersionControl,
    mode: SelectionMode,
    reference: &str,
    paths: &[String],
) -> Result<Vec<CandidatePath>> {
    match mode {
        SelectionMode::FullTree => {
            let mut candidates = vcs.tracked_files(reference, paths)?;
            candidates.extend(vcs.staged_files(reference, paths)?);
            Ok(candidates)
        }
        SelectionMode::ChangedSet => vcs.changed_files(reference, paths),
    }
}

/// `dir` relative to the repository top-level, `/`-separated, empty at the top-level.
pub fn relative_root(dir: &Path, toplevel: &Path) -> String {
    match pathdiff::diff_paths(dir, toplevel) {
        Some(relative) if !relative.starts_with("..") => to_slash(&relative),
        _ => String::new(),
    }
}

/// Explicit path arguments rewritten relative to the top-level, where git runs.
pub fn relative_paths(paths: &[PathBuf], current_dir: &Path, toplevel: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|path| {
            let absolute = current_dir.join(normalize_separators(&path.to_string_lossy()));
            let relative = pathdiff::diff_paths(&absolute, toplevel).unwrap_or(absolute);
            let relative = to_slash(&relative);
            if relative.is_empty() {
                ".".to_string()
            } else {
                relative
            }
        })
        .collect()
}

fn to_slash(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
        .trim_end_matches('/')
        .to_string()
}
