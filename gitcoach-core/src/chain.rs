use crate::{
    constants::{FEATURE_BRANCH_PREFIX, HISTORY_SCAN_DEPTH},
    event::{AppEvent, EventSender},
    git::{CommandSpec, GitRunner},
};
use regex::Regex;
use std::{path::Path, sync::LazyLock};

/// Runs `steps` strictly in order, forwarding their output into the session
/// inbox.
///
/// Every output line becomes [`AppEvent::CommandLine`]. A failing step emits
/// exactly one [`AppEvent::CommandFailed`] and ends the chain; when the last
/// step exits cleanly a single [`AppEvent::ChainComplete`] is emitted instead.
/// There is no retry logic: re-running a git command with side effects (a
/// half-finished rebase, say) needs human judgement, so a failed step is
/// terminal and the user restarts the workflow.
pub fn run_chain(runner: &dyn GitRunner, steps: &[CommandSpec], events: &EventSender) {
    for spec in steps {
        log::debug!("chain step: {}", spec.display());
        let handle = runner.run_streamed(spec);

        for line in handle.lines.iter() {
            events.send(AppEvent::CommandLine(line));
        }

        match handle.result.recv() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                events.send(AppEvent::CommandFailed(format!("{err}")));
                return;
            }
            Err(_) => {
                events.send(AppEvent::CommandFailed(format!(
                    "{}: stream closed without an exit status",
                    spec.display()
                )));
                return;
            }
        }
    }
    events.send(AppEvent::ChainComplete);
}

static NON_BRANCH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9._-]+").expect("static pattern"));

/// Turns free-form user input into a safe branch name fragment: lower-cased,
/// trimmed, every run of other characters collapsed into a single hyphen.
/// Total — the worst input maps to an empty string, never an error.
pub fn sanitize_branch_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    NON_BRANCH_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// checkout main → pull → create the feature branch.
pub fn branch_start_steps(dir: &Path, name: &str) -> Vec<CommandSpec> {
    let branch = format!("{FEATURE_BRANCH_PREFIX}{}", sanitize_branch_name(name));
    vec![
        CommandSpec::new(dir, &["checkout", "main"]),
        CommandSpec::new(dir, &["pull", "origin", "main"]),
        CommandSpec::new(dir, &["checkout", "-b", &branch]),
    ]
}

/// fetch everything, then rebase onto the remote mainline.
pub fn sync_steps(dir: &Path) -> Vec<CommandSpec> {
    vec![
        CommandSpec::new(dir, &["fetch", "--all"]),
        CommandSpec::new(dir, &["rebase", "origin/main"]),
    ]
}

/// Interactive autosquash rebase over the scanned history window.
pub fn cleanup_steps(dir: &Path) -> Vec<CommandSpec> {
    vec![CommandSpec::new(
        dir,
        &["rebase", "-i", "--autosquash", &format!("HEAD~{HISTORY_SCAN_DEPTH}")],
    )]
}

/// Preparation chains for a dirty working tree, run before branch-start.
pub fn stash_steps(dir: &Path) -> Vec<CommandSpec> {
    vec![CommandSpec::new(dir, &["stash", "push", "-u"])]
}

/// Stages everything, then commits interactively (this may open the user's
/// editor, which is why streamed commands get the long deadline).
pub fn commit_all_steps(dir: &Path) -> Vec<CommandSpec> {
    vec![
        CommandSpec::new(dir, &["add", "-A"]),
        CommandSpec::new(dir, &["commit"]),
    ]
}

pub fn discard_steps(dir: &Path) -> Vec<CommandSpec> {
    vec![CommandSpec::new(dir, &["reset", "--hard"])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{MockGitRunner, StreamScript};
    use std::sync::mpsc;

    fn collect_events(runner: &MockGitRunner, steps: &[CommandSpec]) -> Vec<AppEvent> {
        let (tx, rx) = mpsc::channel();
        run_chain(runner, steps, &EventSender::new(tx));
        rx.iter().collect()
    }

    fn steps(dir: &Path, argv: &[&[&str]]) -> Vec<CommandSpec> {
        argv.iter().map(|args| CommandSpec::new(dir, args)).collect()
    }

    #[test]
    fn test_chain_success_emits_lines_then_single_completion() {
        let runner = MockGitRunner::default();
        runner.script_stream("fetch --all", StreamScript::ok(&["Fetching origin"]));
        runner.script_stream("rebase origin/main", StreamScript::ok(&["Successfully rebased"]));

        let dir = Path::new("/tmp/repo");
        let events = collect_events(&runner, &steps(dir, &[&["fetch", "--all"], &["rebase", "origin/main"]]));

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], AppEvent::CommandLine(l) if l == "Fetching origin"));
        assert!(matches!(&events[1], AppEvent::CommandLine(l) if l == "Successfully rebased"));
        assert!(matches!(events[2], AppEvent::ChainComplete));
    }

    #[test]
    fn test_chain_failure_stops_before_later_steps() {
        let runner = MockGitRunner::default();
        runner.script_stream("one", StreamScript::ok(&["step one ran"]));
        runner.script_stream("two", StreamScript::fail(&[], "git two exited with status 1"));
        runner.script_stream("three", StreamScript::ok(&["never"]));

        let dir = Path::new("/tmp/repo");
        let events = collect_events(&runner, &steps(dir, &[&["one"], &["two"], &["three"]]));

        // step three never runs
        assert_eq!(runner.calls(), vec!["one", "two"]);

        let failures = events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandFailed(_)))
            .count();
        let completions = events
            .iter()
            .filter(|e| matches!(e, AppEvent::ChainComplete))
            .count();
        assert_eq!(failures, 1);
        assert_eq!(completions, 0);
    }

    #[test]
    fn test_chain_completion_arrives_after_every_line() {
        let runner = MockGitRunner::default();
        runner.script_stream("a", StreamScript::ok(&["1", "2"]));
        runner.script_stream("b", StreamScript::ok(&["3"]));

        let dir = Path::new("/tmp/repo");
        let events = collect_events(&runner, &steps(dir, &[&["a"], &["b"]]));

        assert!(matches!(events.last(), Some(AppEvent::ChainComplete)));
        let lines: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CommandLine(l) => Some(l.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_chain_completes_immediately() {
        let runner = MockGitRunner::default();
        let events = collect_events(&runner, &[]);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AppEvent::ChainComplete));
    }

    #[test]
    fn test_sanitize_branch_name() {
        assert_eq!(sanitize_branch_name("  Fix Login!!  "), "fix-login");
        assert_eq!(sanitize_branch_name("already-clean_v1.2"), "already-clean_v1.2");
        assert_eq!(sanitize_branch_name("Add   OAuth2  support"), "add-oauth2-support");
        assert_eq!(sanitize_branch_name("!!!"), "");
        assert_eq!(sanitize_branch_name(""), "");
    }

    #[test]
    fn test_branch_start_steps_use_sanitized_name() {
        let steps = branch_start_steps(Path::new("/tmp/repo"), "My Feature");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].args, vec!["checkout", "main"]);
        assert_eq!(steps[1].args, vec!["pull", "origin", "main"]);
        assert_eq!(steps[2].args, vec!["checkout", "-b", "feature/my-feature"]);
    }

    #[test]
    fn test_cleanup_steps_target_scan_window() {
        let steps = cleanup_steps(Path::new("/tmp/repo"));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].args, vec!["rebase", "-i", "--autosquash", "HEAD~20"]);
    }
}
