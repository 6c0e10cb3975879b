use super::provider::{Captured, CommandSpec, GitRunner, RunError, StreamHandle};
use crate::constants::{CAPTURE_TIMEOUT, STDERR_LINE_PREFIX, STREAM_TIMEOUT};
use anyhow::{Context, Result};
use std::{
    io::{BufRead, BufReader, Read},
    process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio},
    sync::mpsc,
    thread,
};
use wait_timeout::ChildExt;

/// Runs git through the real CLI binary.
pub struct CliGitRunner;

impl GitRunner for CliGitRunner {
    fn run_captured(&self, spec: &CommandSpec) -> Result<Captured> {
        let (mut child, stdout, stderr) = spawn(spec)?;

        // Drain both pipes concurrently so a chatty process can't deadlock
        // against a full pipe buffer while we wait on the other stream.
        let out_handle = thread::spawn(move || drain(stdout));
        let err_handle = thread::spawn(move || drain(stderr));

        let timeout = spec.timeout.unwrap_or(CAPTURE_TIMEOUT);
        let mut timed_out = false;
        let status = match child
            .wait_timeout(timeout)
            .with_context(|| format!("wait for {}", spec.display()))?
        {
            Some(status) => status,
            None => {
                log::warn!(
                    "{} exceeded its {}s deadline, killing",
                    spec.display(),
                    timeout.as_secs()
                );
                timed_out = true;
                let _ = child.kill();
                child
                    .wait()
                    .with_context(|| format!("reap {} after kill", spec.display()))?
            }
        };

        let stdout = join_reader(out_handle);
        let stderr = join_reader(err_handle);

        if timed_out {
            return Err(RunError::TimedOut {
                command: spec.display(),
                after: timeout,
            }
            .into());
        }
        if !status.success() {
            return Err(RunError::Exit {
                command: spec.display(),
                code: status.code(),
                stderr: trim_trailing_newlines(&stderr),
            }
            .into());
        }

        Ok(Captured {
            stdout: trim_trailing_newlines(&stdout),
            stderr: trim_trailing_newlines(&stderr),
        })
    }

    fn run_streamed(&self, spec: &CommandSpec) -> StreamHandle {
        let (line_tx, lines) = mpsc::channel::<String>();
        let (result_tx, result) = mpsc::channel::<Result<()>>();
        let spec = spec.clone();

        thread::spawn(move || {
            let stderr_tx = line_tx.clone();
            let outcome = Self::run_streaming(
                &spec,
                move |line| {
                    let _ = line_tx.send(line.to_string());
                },
                move |line| {
                    let _ = stderr_tx.send(format!("{STDERR_LINE_PREFIX}{line}"));
                },
            );
            // Both reader threads have joined by now, so every line is
            // already in the channel when the result lands.
            let _ = result_tx.send(outcome);
        });

        StreamHandle { lines, result }
    }
}

impl CliGitRunner {
    /// Runs a command, invoking the callbacks once per completed output line
    /// and blocking until the process exits.
    ///
    /// Each stream is read by an independent thread, so the two callbacks may
    /// run concurrently with each other; they must hand lines off through a
    /// channel rather than mutate shared state.
    pub fn run_streaming<F, G>(spec: &CommandSpec, on_stdout: F, on_stderr: G) -> Result<()>
    where
        F: FnMut(&str) + Send,
        G: FnMut(&str) + Send,
    {
        let (mut child, stdout, stderr) = spawn(spec)?;
        let timeout = spec.timeout.unwrap_or(STREAM_TIMEOUT);
        let mut timed_out = false;

        let status: ExitStatus = thread::scope(|scope| -> Result<ExitStatus> {
            let out = scope.spawn(move || forward_lines(stdout, on_stdout));
            let err = scope.spawn(move || forward_lines(stderr, on_stderr));

            let status = match child
                .wait_timeout(timeout)
                .with_context(|| format!("wait for {}", spec.display()))?
            {
                Some(status) => status,
                None => {
                    log::warn!(
                        "{} exceeded its {}s deadline, killing",
                        spec.display(),
                        timeout.as_secs()
                    );
                    timed_out = true;
                    let _ = child.kill();
                    child
                        .wait()
                        .with_context(|| format!("reap {} after kill", spec.display()))?
                }
            };

            // The pipes hit EOF once the process is gone, so these joins
            // guarantee every line was delivered before we report the result.
            let _ = out.join();
            let _ = err.join();
            Ok(status)
        })?;

        if timed_out {
            return Err(RunError::TimedOut {
                command: spec.display(),
                after: timeout,
            }
            .into());
        }
        if !status.success() {
            return Err(RunError::Exit {
                command: spec.display(),
                code: status.code(),
                stderr: String::new(),
            }
            .into());
        }
        Ok(())
    }
}

fn spawn(spec: &CommandSpec) -> Result<(Child, ChildStdout, ChildStderr), RunError> {
    let mut child = Command::new("git")
        .args(&spec.args)
        .current_dir(&spec.dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RunError::Launch {
            command: spec.display(),
            message: e.to_string(),
        })?;

    let stdout = child.stdout.take().ok_or_else(|| RunError::Launch {
        command: spec.display(),
        message: "stdout was not piped".to_string(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| RunError::Launch {
        command: spec.display(),
        message: "stderr was not piped".to_string(),
    })?;

    Ok((child, stdout, stderr))
}

fn forward_lines<R: Read, F: FnMut(&str)>(pipe: R, mut emit: F) {
    let reader = BufReader::new(pipe);
    for line in reader.lines() {
        match line {
            Ok(line) => emit(&line),
            Err(_) => break,
        }
    }
}

fn drain<R: Read>(mut pipe: R) -> String {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn join_reader(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

fn trim_trailing_newlines(s: &str) -> String {
    s.trim_end_matches(['\n', '\r']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    fn init_test_repo(dir: &Path) {
        for args in [
            vec!["init"],
            vec!["config", "user.email", "test@test.com"],
            vec!["config", "user.name", "Test"],
        ] {
            Command::new("git")
                .args(&args)
                .current_dir(dir)
                .output()
                .unwrap();
        }
        fs::write(dir.join("README.md"), "# test").unwrap();
        Command::new("git")
            .args(["add", "."])
            .current_dir(dir)
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "-m", "init"])
            .current_dir(dir)
            .output()
            .unwrap();
    }

    #[test]
    fn test_run_captured_trims_trailing_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let captured = CliGitRunner
            .run_captured(&CommandSpec::new(tmp.path(), &["--version"]))
            .unwrap();
        assert!(captured.stdout.starts_with("git version"));
        assert!(!captured.stdout.ends_with('\n'));
    }

    #[test]
    fn test_run_captured_nonzero_exit_is_exit_error_with_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let err = CliGitRunner
            .run_captured(&CommandSpec::new(tmp.path(), &["no-such-subcommand"]))
            .unwrap_err();
        let run_err = err.downcast_ref::<RunError>().unwrap();
        match run_err {
            RunError::Exit { code, stderr, .. } => {
                assert_ne!(*code, Some(0));
                assert!(!stderr.is_empty());
            }
            other => panic!("expected Exit, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_working_directory_is_launch_error() {
        let err = CliGitRunner
            .run_captured(&CommandSpec::new(
                Path::new("/definitely/not/a/real/dir"),
                &["--version"],
            ))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::Launch { .. })
        ));
    }

    #[test]
    fn test_run_streamed_delivers_lines_then_one_result() {
        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());

        let handle =
            CliGitRunner.run_streamed(&CommandSpec::new(tmp.path(), &["log", "--oneline"]));
        let lines: Vec<String> = handle.lines.iter().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("init"));

        assert!(handle.result.recv().unwrap().is_ok());
        // exactly one result, then the channel closes
        assert!(handle.result.recv().is_err());
    }

    #[test]
    fn test_run_streamed_failure_reports_exit_error() {
        let tmp = tempfile::tempdir().unwrap();
        let handle =
            CliGitRunner.run_streamed(&CommandSpec::new(tmp.path(), &["no-such-subcommand"]));
        // drain lines (stderr is merged in, prefixed)
        let lines: Vec<String> = handle.lines.iter().collect();
        assert!(lines.iter().all(|l| l.starts_with(STDERR_LINE_PREFIX)));

        let result = handle.result.recv().unwrap();
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::Exit { .. })
        ));
    }

    #[test]
    fn test_run_streaming_invokes_stdout_callback_per_line() {
        let tmp = tempfile::tempdir().unwrap();
        init_test_repo(tmp.path());
        fs::write(tmp.path().join("second.txt"), "x").unwrap();
        Command::new("git")
            .args(["add", "."])
            .current_dir(tmp.path())
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "-m", "second"])
            .current_dir(tmp.path())
            .output()
            .unwrap();

        let (tx, rx) = mpsc::channel::<String>();
        let err_tx = tx.clone();
        CliGitRunner::run_streaming(
            &CommandSpec::new(tmp.path(), &["log", "--oneline"]),
            move |line| {
                let _ = tx.send(line.to_string());
            },
            move |line| {
                let _ = err_tx.send(format!("stderr: {line}"));
            },
        )
        .unwrap();

        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines.len(), 2);
        // within one stream, order is preserved: newest commit first
        assert!(lines[0].ends_with("second"));
        assert!(lines[1].ends_with("init"));
    }
}
