use super::provider::{Captured, CommandSpec, GitRunner, StreamHandle};
use anyhow::{Result, anyhow};
use std::{
    collections::HashMap,
    sync::{Mutex, mpsc},
};

/// Scripted behaviour for one streamed command: the lines it emits, then an
/// optional failure message.
#[derive(Debug, Clone, Default)]
pub struct StreamScript {
    pub lines: Vec<String>,
    pub error: Option<String>,
}

impl StreamScript {
    pub fn ok(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            error: None,
        }
    }

    pub fn fail(lines: &[&str], error: &str) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            error: Some(error.to_string()),
        }
    }
}

/// Test double. Keyed by the joined argument vector; unscripted commands
/// succeed with empty output.
#[derive(Default)]
pub struct MockGitRunner {
    pub captured: Mutex<HashMap<String, Result<Captured, String>>>,
    pub streams: Mutex<HashMap<String, StreamScript>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGitRunner {
    pub fn script_captured(&self, args: &str, result: Result<Captured, String>) {
        self.captured.lock().unwrap().insert(args.to_string(), result);
    }

    pub fn script_stream(&self, args: &str, script: StreamScript) {
        self.streams.lock().unwrap().insert(args.to_string(), script);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn key(spec: &CommandSpec) -> String {
        spec.args.join(" ")
    }
}

impl GitRunner for MockGitRunner {
    fn run_captured(&self, spec: &CommandSpec) -> Result<Captured> {
        let key = Self::key(spec);
        self.calls.lock().unwrap().push(key.clone());
        match self.captured.lock().unwrap().get(&key) {
            Some(Ok(captured)) => Ok(captured.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Ok(Captured::default()),
        }
    }

    fn run_streamed(&self, spec: &CommandSpec) -> StreamHandle {
        let key = Self::key(spec);
        self.calls.lock().unwrap().push(key.clone());
        let script = self
            .streams
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default();

        let (line_tx, lines) = mpsc::channel();
        let (result_tx, result) = mpsc::channel();
        for line in script.lines {
            let _ = line_tx.send(line);
        }
        let _ = result_tx.send(match script.error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        });

        StreamHandle { lines, result }
    }
}
