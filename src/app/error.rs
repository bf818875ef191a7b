use std::path::PathBuf;
use thiserror::Error;

/// Exit code for failures that do not come from a collaborator's exit status.
pub const UNCLASSIFIED_EXIT_CODE: i32 = 255;

/// Failures of the external programs this tool drives (git, the formatter)
/// and of the file access around them.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("`{command}` exited with {status}: {stderr}", status = describe_status(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// Reading or rewriting one file failed. Reported per file, never fatal.
    #[error("Failed to {action} {}: {source}", .path.display())]
    FileAccess {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl ToolError {
    pub fn is_file_access(&self) -> bool {
        matches!(self, ToolError::FileAccess { .. })
    }

    /// The exit code the process should mirror for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::CommandFailed { code: Some(code), .. } if *code != 0 => *code,
            _ => UNCLASSIFIED_EXIT_CODE,
        }
    }
}

/// Process exit code for an error surfaced from `app::run`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ToolError>())
        .map_or(UNCLASSIFIED_EXIT_CODE, ToolError::exit_code)
}
