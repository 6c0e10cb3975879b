use std::time::Duration;

/// Deadline for captured (buffered) git invocations.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(8);

/// Deadline for streamed invocations. Much longer than [`CAPTURE_TIMEOUT`]
/// because a streamed command may block on user input mid-run (e.g. `git
/// commit` opening an editor).
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(8 * 60);

/// How many log lines each screen keeps visible.
pub const VISIBLE_LOG_LINES: usize = 10;

/// How far back the cleanup workflow looks for noisy commits, both in the
/// `git log` scan and in the `HEAD~N` rebase target.
pub const HISTORY_SCAN_DEPTH: usize = 20;

/// Prefix applied to sanitized branch names by the branch-start workflow.
pub const FEATURE_BRANCH_PREFIX: &str = "feature/";

/// Marker prepended to stderr lines when both streams are merged into one
/// advisory log.
pub const STDERR_LINE_PREFIX: &str = "[stderr] ";
