/// Every user interaction produces an Action. Screens never call git directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // Prompts and lists
    Confirm,
    MoveSelection(i32),

    // Text input (branch name)
    InputChar(char),
    InputBackspace,

    // Guided tour navigation
    TutorNext,
    TutorPrev,
    TutorRun,
    TutorComplete,
}
