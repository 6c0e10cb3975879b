use anyhow::Result;
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};

/// One git invocation: argument vector, working directory, optional deadline
/// override. Immutable once built; the runner clones it for the duration of
/// a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(dir: &Path, args: &[&str]) -> Self {
        Self {
            args: args.iter().map(ToString::to_string).collect(),
            dir: dir.to_path_buf(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The command line as it appears in logs and error messages.
    pub fn display(&self) -> String {
        format!("git {}", self.args.join(" "))
    }
}

/// Buffered output of a completed invocation, trailing newlines trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

/// Channel pair for one streamed invocation.
///
/// `lines` carries stdout and stderr merged into a single advisory log
/// (stderr lines prefixed); order is only meaningful within one stream.
/// Both channels close once the output is fully drained and the exit status
/// is known; `result` yields exactly one value before closing.
pub struct StreamHandle {
    pub lines: mpsc::Receiver<String>,
    pub result: mpsc::Receiver<Result<()>>,
}

/// Why an invocation failed. Callers can tell "could not run" apart from
/// "ran and failed" by matching on the variant.
#[derive(Debug)]
pub enum RunError {
    /// The process never started (missing executable, pipe setup failure).
    Launch { command: String, message: String },
    /// The process ran to completion and exited non-zero.
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// The deadline expired and the process was killed.
    TimedOut { command: String, after: Duration },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch { command, message } => {
                write!(f, "failed to launch {command}: {message}")
            }
            Self::Exit {
                command,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "{command} exited with status {code}")?,
                    None => write!(f, "{command} was killed by a signal")?,
                }
                if stderr.is_empty() {
                    Ok(())
                } else {
                    write!(f, ": {stderr}")
                }
            }
            Self::TimedOut { command, after } => {
                write!(f, "{command} timed out after {}s", after.as_secs())
            }
        }
    }
}

impl std::error::Error for RunError {}

/// Boundary to the external git executable. Implemented by [`CliGitRunner`]
/// for real use and by [`MockGitRunner`] in tests, so chains and workflow
/// state machines can be exercised without spawning processes.
///
/// [`CliGitRunner`]: super::CliGitRunner
/// [`MockGitRunner`]: super::mock::MockGitRunner
pub trait GitRunner: Send + Sync {
    /// Run to completion, buffering all output. A non-zero exit is an error
    /// carrying the captured stderr.
    fn run_captured(&self, spec: &CommandSpec) -> Result<Captured>;

    /// Start the command and return channels for its merged line output and
    /// final result. Never blocks the caller.
    fn run_streamed(&self, spec: &CommandSpec) -> StreamHandle;
}
