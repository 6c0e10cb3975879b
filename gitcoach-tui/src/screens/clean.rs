use crate::theme::Theme;
use gitcoach_core::state::{AppState, CLEAN_CONFIRM_CHOICES, CleanPhase, CleanState, Workflow};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, List, ListItem},
};
use std::time::Instant;

const TITLE: &str = "gitcoach — clean up noisy commits";

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let Workflow::Clean(clean) = &state.workflow else {
        return;
    };
    match clean.phase {
        CleanPhase::Confirm { selected } => draw_confirm(f, area, clean, selected, theme),
        _ => draw_progress(f, area, clean, state, theme, spinner_start),
    }
}

fn draw_confirm(f: &mut Frame, area: Rect, clean: &CleanState, selected: usize, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(4),
    ])
    .split(area);

    super::draw_title(f, chunks[0], TITLE, theme);

    f.render_widget(noisy_list(clean, theme), chunks[1]);

    let choices: Vec<ListItem> = CLEAN_CONFIRM_CHOICES
        .iter()
        .map(|choice| ListItem::new(*choice))
        .collect();
    super::draw_choice_list(
        f,
        chunks[2],
        " run `git rebase -i --autosquash`? ",
        choices,
        selected,
        theme,
    );
}

fn draw_progress(
    f: &mut Frame,
    area: Rect,
    clean: &CleanState,
    state: &AppState,
    theme: &Theme,
    spinner_start: &Instant,
) {
    let (title_area, status_area, body_area, log_area) = super::split_screen(area);

    super::draw_title(f, title_area, TITLE, theme);

    let status = if state.error.is_some() {
        super::done_status("Clean-up failed.", false, theme)
    } else if matches!(clean.phase, CleanPhase::NothingToDo) {
        super::done_status("No noisy commits detected. Nothing to clean.", true, theme)
    } else if state.done {
        super::done_status("Clean-up complete.", true, theme)
    } else if matches!(clean.phase, CleanPhase::Scanning) {
        super::running_status(spinner_start, "Scanning recent history...", theme)
    } else {
        super::running_status(spinner_start, "Rebasing with autosquash...", theme)
    };
    super::draw_status(f, status_area, status);

    if !clean.noisy.is_empty() {
        f.render_widget(noisy_list(clean, theme), body_area);
    }

    super::draw_log_panel(f, log_area, &state.log, theme);
}

fn noisy_list<'a>(clean: &'a CleanState, theme: &Theme) -> List<'a> {
    let items: Vec<ListItem> = clean
        .noisy
        .iter()
        .map(|line| ListItem::new(Span::raw(line.as_str())))
        .collect();
    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} noisy commit(s) ", clean.noisy.len()))
            .border_style(Style::default().fg(theme.warning)),
    )
}
