use crate::app::error::ToolError;
use crate::app::models::{CandidatePath, Selection};
use anyhow::Result;
use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// An external code formatter.
pub trait Formatter {
    /// Rewrites `files` in place. `files` are relative to `cwd`.
    fn format_in_place(&self, files: &[CandidatePath], cwd: &Path) -> Result<()>;

    /// Formats `file` as if it were JSON, whatever its extension says.
    fn format_as_json(&self, file: &CandidatePath, cwd: &Path) -> Result<()>;
}

pub struct ClangFormat {
    binary: String,
}

impl ClangFormat {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, command: &mut Command, description: String) -> Result<Output, ToolError> {
        log::debug!("Running `{}`", description);
        let output = command.output().map_err(|source| ToolError::Spawn {
            command: description.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(ToolError::CommandFailed {
                command: description,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Formatter for ClangFormat {
    fn format_in_place(&self, files: &[CandidatePath], cwd: &Path) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let args: Vec<&str> = files.iter().map(CandidatePath::as_str).collect();
        let description = format!("{} -i {}", self.binary, args.join(" "));

        let mut command = Command::new(&self.binary);
        command
            .arg("-i")
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::null());
        self.run(&mut command, description)?;
        Ok(())
    }

    fn format_as_json(&self, file: &CandidatePath, cwd: &Path) -> Result<()> {
        let path = cwd.join(file.as_str());
        let assume = format!("--assume-filename={}.json", file);
        let description = format!("{} {} < {}", self.binary, assume, file);

        // The handle moves into the child's stdin and is closed once `output` returns.
        let input = File::open(&path).map_err(|source| ToolError::FileAccess {
            action: "open",
            path: path.clone(),
            source,
        })?;
        let mut command = Command::new(&self.binary);
        command
            .arg(&assume)
            .current_dir(cwd)
            .stdin(Stdio::from(input));
        let output = self.run(&mut command, description)?;

        fs::write(&path, &output.stdout).map_err(|source| ToolError::FileAccess {
            action: "write",
            path,
            source,
        })?;
        Ok(())
    }
}

/// Which files a run formatted and which it could not.
#[derive(Debug, Default)]
pub struct FormatOutcome {
    pub formatted: Selection,
    pub failed: Vec<CandidatePath>,
}

/// Runs the formatter over a selection.
///
/// File access errors on a single manifest are logged and skipped. Any other
/// failure is returned at once with `check`; without it the failure is logged
/// and the remaining files are still formatted.
pub fn apply(
    formatter: &dyn Formatter,
    selection: &Selection,
    cwd: &Path,
    check: bool,
) -> Result<FormatOutcome> {
    let mut outcome = FormatOutcome::default();

    for file in &selection.json_files {
        match formatter.format_as_json(file, cwd) {
            Ok(()) => outcome.formatted.json_files.push(file.clone()),
            Err(err) => {
                if check && !is_file_access(&err) {
                    return Err(err);
                }
                log::error!("{:#}", err);
                outcome.failed.push(file.clone());
            }
        }
    }

    match formatter.format_in_place(&selection.source_files, cwd) {
        Ok(()) => outcome
            .formatted
            .source_files
            .extend(selection.source_files.iter().cloned()),
        Err(err) => {
            if check {
                return Err(err);
            }
            log::error!("{:#}", err);
            outcome.failed.extend(selection.source_files.iter().cloned());
        }
    }

    Ok(outcome)
}

fn is_file_access(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ToolError>()
        .is_some_and(ToolError::is_file_access)
}

/// The report printed in verbose mode: manifests first, then sources, then failures.
pub fn report(outcome: &FormatOutcome) -> String {
    let mut sections = Vec::new();
    if !outcome.formatted.is_empty() {
        let files = outcome
            .formatted
            .json_files
            .iter()
            .chain(&outcome.formatted.source_files);
        sections.push(list_section("Formatted the following files:", files));
    }
    if !outcome.failed.is_empty() {
        sections.push(list_section(
            "Failed to format the following files:",
            outcome.failed.iter(),
        ));
    }
    sections.join("\n")
}

fn list_section<'a>(title: &str, files: impl Iterator<Item = &'a CandidatePath>) -> String {
    let mut out = String::from(title);
    for file in files {
        out.push('\n');
        out.push_str(file.as_str());
    }
    out
}
