mod logging;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gitcoach_core::{
    git::{self, CliGitRunner, GitRunner},
    state::AppState,
};
use gitcoach_tui::Theme;
use std::{path::PathBuf, process::ExitCode, sync::Arc};

#[derive(Parser)]
#[command(
    version,
    about = "Guided git workflows in your terminal",
    arg_required_else_help = true
)]
struct Cli {
    /// Run against this directory instead of the current one
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Level for the debug log file (error, warn, info, debug, trace)
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a feature branch off an up-to-date main
    Start {
        /// Branch name; prompted for interactively when omitted
        name: Option<String>,
    },
    /// Fetch all remotes and rebase the current branch onto origin/main
    Sync,
    /// Find noisy commits in recent history and autosquash them
    Clean,
    /// Guided tour of the workflows
    Tutor,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(error) = logging::setup_logging(cli.log_level) {
        // A missing log file never blocks the workflows themselves
        eprintln!("Warning: could not set up logging: {error}");
    }

    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve current directory")?,
    };

    let runner: Arc<dyn GitRunner> = Arc::new(CliGitRunner);
    let repo_ready = git::is_repo(runner.as_ref(), &dir);

    let mut state = match cli.command {
        Commands::Start { name } => AppState::start(dir, name.unwrap_or_default()),
        Commands::Sync => AppState::sync(dir),
        Commands::Clean => AppState::clean(dir),
        Commands::Tutor => AppState::tutor(dir, repo_ready),
    };

    // The tour explains itself outside a repository; everything else needs one
    if !matches!(state.workflow, gitcoach_core::state::Workflow::Tutor(_)) && !repo_ready {
        bail!("{} is not inside a git repository", state.dir.display());
    }

    let theme = Theme::default();
    let mut terminal = ratatui::init();
    let result = gitcoach_tui::run(&mut terminal, &mut state, &runner, &theme);
    ratatui::restore();
    result
}
