use std::path::{Path, PathBuf};

use crate::{
    action::Action,
    chain::{
        branch_start_steps, cleanup_steps, commit_all_steps, discard_steps, sanitize_branch_name,
        stash_steps, sync_steps,
    },
    constants::{FEATURE_BRANCH_PREFIX, VISIBLE_LOG_LINES},
    event::AppEvent,
    git::{CommandSpec, StatusEntry},
};

/// Background work the event loop must kick off after a state transition.
/// Transitions themselves are pure; all spawning happens in the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the (single) chain for this session phase.
    RunChain(Vec<CommandSpec>),
    /// Decode a fresh `status --porcelain` listing in the background.
    LoadStatus,
    /// Scan recent history for noisy commits in the background.
    ScanHistory,
}

/// Accumulated command output. Every line is retained; the display window is
/// the most recent [`VISIBLE_LOG_LINES`] lines.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: Vec<String>,
}

impl LogBuffer {
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The visible window, oldest first.
    pub fn tail(&self) -> &[String] {
        let start = self.lines.len().saturating_sub(VISIBLE_LOG_LINES);
        &self.lines[start..]
    }
}

/// What to do about a dirty working tree before starting a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyChoice {
    Stash,
    CommitAll,
    Discard,
    Quit,
}

impl DirtyChoice {
    pub const ALL: [Self; 4] = [Self::Stash, Self::CommitAll, Self::Discard, Self::Quit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Stash => "Stash changes",
            Self::CommitAll => "Commit all changes",
            Self::Discard => "Discard changes",
            Self::Quit => "Quit",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Self::Stash => "Stash uncommitted changes, untracked files included",
            Self::CommitAll => "Stage everything and commit (opens your editor)",
            Self::Discard => "Hard-reset the working tree",
            Self::Quit => "Exit without touching anything",
        }
    }

    /// The preparation chain for this choice; `None` for [`Self::Quit`].
    pub fn preparation_steps(self, dir: &Path) -> Option<Vec<CommandSpec>> {
        match self {
            Self::Stash => Some(stash_steps(dir)),
            Self::CommitAll => Some(commit_all_steps(dir)),
            Self::Discard => Some(discard_steps(dir)),
            Self::Quit => None,
        }
    }
}

#[derive(Debug)]
pub enum StartPhase {
    /// Waiting for the user to type a branch name.
    EnterName,
    /// Waiting for the background dirty-tree check.
    CheckingTree,
    /// The tree is dirty; waiting for the user to pick what to do.
    DirtyPrompt {
        entries: Vec<StatusEntry>,
        selected: usize,
    },
    /// The chosen preparation chain is running.
    Preparing(DirtyChoice),
    /// The checkout → pull → branch chain is running.
    Running,
}

#[derive(Debug)]
pub struct StartState {
    /// Branch name as given or typed; sanitized only when the chain is built.
    pub name: String,
    pub phase: StartPhase,
}

impl StartState {
    /// The full branch name the chain will create.
    pub fn branch_label(&self) -> String {
        format!("{FEATURE_BRANCH_PREFIX}{}", sanitize_branch_name(&self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// fetch → rebase chain in flight.
    Running,
    /// Chain done, waiting for the fresh status listing.
    Refreshing,
}

#[derive(Debug)]
pub struct SyncState {
    pub phase: SyncPhase,
    /// Working-tree entries decoded after the chain succeeded.
    pub files: Option<Vec<StatusEntry>>,
}

/// Binary confirmation for the cleanup rebase; index 0 is affirmative.
pub const CLEAN_CONFIRM_CHOICES: [&str; 2] = [
    "Yes, run the autosquash rebase",
    "No, leave history as it is",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanPhase {
    /// Waiting for the background history scan.
    Scanning,
    Confirm { selected: usize },
    Running,
    /// Scan found nothing; no prompt, no mutation.
    NothingToDo,
}

#[derive(Debug)]
pub struct CleanState {
    pub phase: CleanPhase,
    pub noisy: Vec<String>,
}

#[derive(Debug)]
pub struct TutorStep {
    pub title: &'static str,
    pub description: &'static str,
    pub command: &'static str,
    /// The real commands this step demonstrates, empty if it is read-only.
    pub chain: Vec<CommandSpec>,
    pub completed: bool,
}

#[derive(Debug)]
pub struct TutorState {
    pub steps: Vec<TutorStep>,
    pub current: usize,
    pub repo_ready: bool,
    /// Index of the step whose chain is in flight, if any.
    pub running: Option<usize>,
}

#[derive(Debug)]
pub enum Workflow {
    Start(StartState),
    Sync(SyncState),
    Clean(CleanState),
    Tutor(TutorState),
}

/// The single-threaded session backing one interactive screen.
///
/// All mutation happens through [`AppState::handle_event`] and
/// [`AppState::handle_action`], called only from the event loop; background
/// producers communicate exclusively through [`AppEvent`]s. Once `done`
/// latches, further chain events are ignored (quit always works).
#[derive(Debug)]
pub struct AppState {
    pub dir: PathBuf,
    pub workflow: Workflow,
    pub log: LogBuffer,
    pub error: Option<String>,
    /// Terminal success or failure; the screen stays up for inspection.
    pub done: bool,
    /// The user chose to leave; the loop tears the screen down immediately,
    /// abandoning any in-flight chain.
    pub exited: bool,
}

impl AppState {
    pub fn start(dir: PathBuf, name: String) -> Self {
        Self::new(
            dir,
            Workflow::Start(StartState {
                name,
                phase: StartPhase::EnterName,
            }),
        )
    }

    pub fn sync(dir: PathBuf) -> Self {
        Self::new(
            dir,
            Workflow::Sync(SyncState {
                phase: SyncPhase::Running,
                files: None,
            }),
        )
    }

    pub fn clean(dir: PathBuf) -> Self {
        Self::new(
            dir,
            Workflow::Clean(CleanState {
                phase: CleanPhase::Scanning,
                noisy: Vec::new(),
            }),
        )
    }

    pub fn tutor(dir: PathBuf, repo_ready: bool) -> Self {
        let steps = vec![
            TutorStep {
                title: "Start a feature branch",
                description: "gitcoach start checks out main, pulls the latest \
                              changes, then creates a fresh feature branch for you. \
                              Running this step performs those commands against the \
                              current repository with a demo branch name.",
                command: "gitcoach start login-api",
                chain: branch_start_steps(&dir, "login-api"),
                completed: false,
            },
            TutorStep {
                title: "Sync with main",
                description: "gitcoach sync fetches every remote and rebases your \
                              branch onto origin/main, keeping your history linear. \
                              Running this step performs the fetch and rebase here.",
                command: "gitcoach sync",
                chain: sync_steps(&dir),
                completed: false,
            },
        ];
        Self::new(
            dir,
            Workflow::Tutor(TutorState {
                steps,
                current: 0,
                repo_ready,
                running: None,
            }),
        )
    }

    fn new(dir: PathBuf, workflow: Workflow) -> Self {
        Self {
            dir,
            workflow,
            log: LogBuffer::default(),
            error: None,
            done: false,
            exited: false,
        }
    }

    /// First effect of the session, run once before the loop starts.
    pub fn on_enter(&mut self) -> Option<Effect> {
        match &mut self.workflow {
            Workflow::Start(start) => {
                if sanitize_branch_name(&start.name).is_empty() {
                    start.name.clear();
                    start.phase = StartPhase::EnterName;
                    None
                } else {
                    start.phase = StartPhase::CheckingTree;
                    Some(Effect::LoadStatus)
                }
            }
            Workflow::Sync(_) => Some(Effect::RunChain(sync_steps(&self.dir))),
            Workflow::Clean(_) => Some(Effect::ScanHistory),
            Workflow::Tutor(_) => None,
        }
    }

    /// Feed one background event through the state machine.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Effect> {
        if self.done || self.exited {
            // Terminal state reached; late chain events are dropped.
            return None;
        }
        match event {
            AppEvent::CommandLine(line) => {
                self.log.push(line);
                None
            }
            AppEvent::CommandFailed(message) => {
                self.fail(message);
                None
            }
            AppEvent::ChainComplete => self.on_chain_complete(),
            AppEvent::StatusLoaded(entries) => self.on_status_loaded(entries),
            AppEvent::HistoryScanned(noisy) => self.on_history_scanned(noisy),
        }
    }

    /// Feed one user action through the state machine. Quit is also handled
    /// by the loop directly; it is honored here for completeness.
    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        if action == Action::Quit {
            self.exited = true;
            return None;
        }
        match &mut self.workflow {
            Workflow::Start(start) => match action {
                Action::InputChar(c) => {
                    if matches!(start.phase, StartPhase::EnterName) {
                        start.name.push(c);
                    }
                    None
                }
                Action::InputBackspace => {
                    if matches!(start.phase, StartPhase::EnterName) {
                        start.name.pop();
                    }
                    None
                }
                Action::MoveSelection(delta) => {
                    if let StartPhase::DirtyPrompt { selected, .. } = &mut start.phase {
                        move_selection(selected, DirtyChoice::ALL.len(), delta);
                    }
                    None
                }
                Action::Confirm => match &start.phase {
                    StartPhase::EnterName => {
                        if sanitize_branch_name(&start.name).is_empty() {
                            self.error = Some("enter a branch name first".to_string());
                            None
                        } else {
                            self.error = None;
                            start.phase = StartPhase::CheckingTree;
                            Some(Effect::LoadStatus)
                        }
                    }
                    StartPhase::DirtyPrompt { selected, .. } => {
                        let choice = DirtyChoice::ALL[(*selected).min(DirtyChoice::ALL.len() - 1)];
                        match choice.preparation_steps(&self.dir) {
                            Some(steps) => {
                                start.phase = StartPhase::Preparing(choice);
                                Some(Effect::RunChain(steps))
                            }
                            None => {
                                self.exited = true;
                                None
                            }
                        }
                    }
                    _ => None,
                },
                _ => None,
            },
            Workflow::Sync(_) => None,
            Workflow::Clean(clean) => match action {
                Action::MoveSelection(delta) => {
                    if let CleanPhase::Confirm { selected } = &mut clean.phase {
                        move_selection(selected, CLEAN_CONFIRM_CHOICES.len(), delta);
                    }
                    None
                }
                Action::Confirm => {
                    if let CleanPhase::Confirm { selected } = clean.phase {
                        if selected == 0 {
                            clean.phase = CleanPhase::Running;
                            Some(Effect::RunChain(cleanup_steps(&self.dir)))
                        } else {
                            self.exited = true;
                            None
                        }
                    } else {
                        None
                    }
                }
                _ => None,
            },
            Workflow::Tutor(tutor) => match action {
                Action::TutorNext => {
                    if tutor.current + 1 < tutor.steps.len() {
                        tutor.current += 1;
                    }
                    None
                }
                Action::TutorPrev => {
                    tutor.current = tutor.current.saturating_sub(1);
                    None
                }
                Action::TutorComplete => {
                    tutor.steps[tutor.current].completed = true;
                    self.log
                        .push(format!("Step marked complete: {}", tutor.steps[tutor.current].title));
                    None
                }
                Action::TutorRun => {
                    if tutor.running.is_some() {
                        self.log.push("A step is already running.".to_string());
                        return None;
                    }
                    if !tutor.repo_ready {
                        self.log
                            .push("Not inside a git repository; cannot run this step.".to_string());
                        return None;
                    }
                    self.error = None;
                    tutor.running = Some(tutor.current);
                    self.log
                        .push(format!("Running step: {}", tutor.steps[tutor.current].title));
                    Some(Effect::RunChain(tutor.steps[tutor.current].chain.clone()))
                }
                _ => None,
            },
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        if let Workflow::Tutor(tutor) = &mut self.workflow {
            // The tour stays navigable after a failed step run.
            tutor.running = None;
        } else {
            self.done = true;
        }
    }

    fn on_chain_complete(&mut self) -> Option<Effect> {
        match &mut self.workflow {
            Workflow::Start(start) => {
                if matches!(start.phase, StartPhase::Preparing(_)) {
                    start.phase = StartPhase::Running;
                    Some(Effect::RunChain(branch_start_steps(&self.dir, &start.name)))
                } else if matches!(start.phase, StartPhase::Running) {
                    self.done = true;
                    None
                } else {
                    None
                }
            }
            Workflow::Sync(sync) => {
                if sync.phase == SyncPhase::Running {
                    sync.phase = SyncPhase::Refreshing;
                    Some(Effect::LoadStatus)
                } else {
                    None
                }
            }
            Workflow::Clean(clean) => {
                if clean.phase == CleanPhase::Running {
                    self.done = true;
                }
                None
            }
            Workflow::Tutor(tutor) => {
                if let Some(idx) = tutor.running.take() {
                    self.log
                        .push(format!("Step finished: {}", tutor.steps[idx].title));
                }
                None
            }
        }
    }

    fn on_status_loaded(&mut self, entries: Vec<StatusEntry>) -> Option<Effect> {
        match &mut self.workflow {
            Workflow::Start(start) => {
                if !matches!(start.phase, StartPhase::CheckingTree) {
                    return None;
                }
                if entries.is_empty() {
                    start.phase = StartPhase::Running;
                    Some(Effect::RunChain(branch_start_steps(&self.dir, &start.name)))
                } else {
                    start.phase = StartPhase::DirtyPrompt {
                        entries,
                        selected: 0,
                    };
                    None
                }
            }
            Workflow::Sync(sync) => {
                if sync.phase == SyncPhase::Refreshing {
                    sync.files = Some(entries);
                    self.done = true;
                }
                None
            }
            _ => None,
        }
    }

    fn on_history_scanned(&mut self, noisy: Vec<String>) -> Option<Effect> {
        if let Workflow::Clean(clean) = &mut self.workflow {
            if clean.phase == CleanPhase::Scanning {
                if noisy.is_empty() {
                    clean.phase = CleanPhase::NothingToDo;
                    self.done = true;
                } else {
                    clean.noisy = noisy;
                    clean.phase = CleanPhase::Confirm { selected: 0 };
                }
            }
        }
        None
    }
}

fn move_selection(selected: &mut usize, len: usize, delta: i32) {
    if len == 0 {
        return;
    }
    let next = (*selected as i32 + delta).clamp(0, len as i32 - 1);
    *selected = next as usize;
}
