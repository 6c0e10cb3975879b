pub mod cli;
pub mod mock;
pub mod provider;
pub mod status;

pub use cli::CliGitRunner;
pub use provider::{Captured, CommandSpec, GitRunner, RunError, StreamHandle};
pub use status::{StatusEntry, parse_status_porcelain};

use std::path::Path;

/// Whether `dir` is inside a git repository.
pub fn is_repo(runner: &dyn GitRunner, dir: &Path) -> bool {
    runner
        .run_captured(&CommandSpec::new(dir, &["rev-parse", "--git-dir"]))
        .is_ok()
}

/// The invocation whose output feeds [`parse_status_porcelain`].
pub fn status_spec(dir: &Path) -> CommandSpec {
    CommandSpec::new(dir, &["status", "--porcelain"])
}
