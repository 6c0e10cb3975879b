pub mod action;
pub mod chain;
pub mod constants;
pub mod event;
pub mod git;
pub mod history;
pub mod state;

// Re-export commonly used types at crate root
pub use action::Action;
pub use chain::run_chain;
pub use event::{AppEvent, EventSender};
pub use git::{CliGitRunner, CommandSpec, GitRunner, StatusEntry};
pub use state::{AppState, Effect, Workflow};
