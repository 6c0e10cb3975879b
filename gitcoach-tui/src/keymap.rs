use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gitcoach_core::{
    action::Action,
    state::{AppState, CleanPhase, StartPhase, Workflow},
};

/// Resolve a key event into an Action based on the current workflow phase.
pub fn resolve_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    // Global interrupt, honored in every state
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match &state.workflow {
        Workflow::Start(start) => resolve_start_key(key.code, &start.phase),
        Workflow::Sync(_) => resolve_plain_key(key.code),
        Workflow::Clean(clean) => resolve_clean_key(key.code, clean.phase),
        Workflow::Tutor(_) => resolve_tutor_key(key.code),
    }
}

fn resolve_start_key(key: KeyCode, phase: &StartPhase) -> Option<Action> {
    match phase {
        // While typing a branch name, 'q' is just a letter
        StartPhase::EnterName => match key {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Char(c) => Some(Action::InputChar(c)),
            _ => None,
        },
        StartPhase::DirtyPrompt { .. } => resolve_list_key(key),
        StartPhase::CheckingTree | StartPhase::Preparing(_) | StartPhase::Running => {
            resolve_plain_key(key)
        }
    }
}

fn resolve_clean_key(key: KeyCode, phase: CleanPhase) -> Option<Action> {
    match phase {
        CleanPhase::Confirm { .. } => resolve_list_key(key),
        CleanPhase::Scanning | CleanPhase::Running | CleanPhase::NothingToDo => {
            resolve_plain_key(key)
        }
    }
}

fn resolve_tutor_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('n') => Some(Action::TutorNext),
        KeyCode::Char('p') => Some(Action::TutorPrev),
        KeyCode::Char('r') => Some(Action::TutorRun),
        KeyCode::Char('c') => Some(Action::TutorComplete),
        _ => None,
    }
}

fn resolve_list_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Up => Some(Action::MoveSelection(-1)),
        KeyCode::Down => Some(Action::MoveSelection(1)),
        _ => None,
    }
}

fn resolve_plain_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let state = AppState::start(PathBuf::from("/tmp/repo"), String::new());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(resolve_action(ctrl_c, &state), Some(Action::Quit));
    }

    #[test]
    fn test_q_is_input_while_typing_a_branch_name() {
        let state = AppState::start(PathBuf::from("/tmp/repo"), String::new());
        assert_eq!(
            resolve_action(key(KeyCode::Char('q')), &state),
            Some(Action::InputChar('q'))
        );
        assert_eq!(
            resolve_action(key(KeyCode::Enter), &state),
            Some(Action::Confirm)
        );
        assert_eq!(resolve_action(key(KeyCode::Esc), &state), Some(Action::Quit));
    }

    #[test]
    fn test_sync_only_accepts_quit() {
        let state = AppState::sync(PathBuf::from("/tmp/repo"));
        assert_eq!(
            resolve_action(key(KeyCode::Char('q')), &state),
            Some(Action::Quit)
        );
        assert_eq!(resolve_action(key(KeyCode::Enter), &state), None);
        assert_eq!(resolve_action(key(KeyCode::Char('x')), &state), None);
    }

    #[test]
    fn test_tutor_navigation_keys() {
        let state = AppState::tutor(PathBuf::from("/tmp/repo"), true);
        assert_eq!(
            resolve_action(key(KeyCode::Char('n')), &state),
            Some(Action::TutorNext)
        );
        assert_eq!(
            resolve_action(key(KeyCode::Char('p')), &state),
            Some(Action::TutorPrev)
        );
        assert_eq!(
            resolve_action(key(KeyCode::Char('r')), &state),
            Some(Action::TutorRun)
        );
        assert_eq!(
            resolve_action(key(KeyCode::Char('c')), &state),
            Some(Action::TutorComplete)
        );
        assert_eq!(
            resolve_action(key(KeyCode::Char('q')), &state),
            Some(Action::Quit)
        );
    }
}
