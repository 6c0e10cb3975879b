use crate::theme::Theme;
use gitcoach_core::{
    chain::sanitize_branch_name,
    git::StatusEntry,
    state::{AppState, DirtyChoice, StartPhase, StartState, Workflow},
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "gitcoach — start a feature branch";

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let Workflow::Start(start) = &state.workflow else {
        return;
    };
    match &start.phase {
        StartPhase::EnterName => draw_name_input(f, area, start, theme),
        StartPhase::DirtyPrompt { entries, selected } => {
            draw_dirty_prompt(f, area, entries, *selected, theme);
        }
        StartPhase::CheckingTree | StartPhase::Preparing(_) | StartPhase::Running => {
            draw_progress(f, area, start, state, theme, spinner_start);
        }
    }
}

fn draw_name_input(f: &mut Frame, area: Rect, start: &StartState, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    super::draw_title(f, chunks[0], TITLE, theme);

    let input_text = if start.name.is_empty() {
        Line::from(Span::styled(
            "e.g. login-api",
            Style::default().fg(theme.muted),
        ))
    } else {
        Line::from(start.name.as_str())
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" feature branch name ")
        .border_style(Style::default().fg(theme.accent));
    f.render_widget(Paragraph::new(input_text).block(input_block), chunks[1]);
    f.set_cursor_position((
        chunks[1].x + 1 + start.name.width() as u16,
        chunks[1].y + 1,
    ));

    let sanitized = sanitize_branch_name(&start.name);
    if !sanitized.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("will create feature/{sanitized}"),
                Style::default().fg(theme.muted),
            )),
            chunks[2],
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter to continue · Esc to quit",
            Style::default().fg(theme.muted),
        )),
        chunks[3],
    );
}

fn draw_dirty_prompt(
    f: &mut Frame,
    area: Rect,
    entries: &[StatusEntry],
    selected: usize,
    theme: &Theme,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(6),
    ])
    .split(area);

    super::draw_title(f, chunks[0], TITLE, theme);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(super::status_entry_line(entry, theme)))
        .collect();
    let files = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} uncommitted change(s) ", entries.len()))
            .border_style(Style::default().fg(theme.warning)),
    );
    f.render_widget(files, chunks[1]);

    let choices: Vec<ListItem> = DirtyChoice::ALL
        .iter()
        .map(|choice| {
            ListItem::new(Line::from(vec![
                Span::raw(choice.label()),
                Span::styled(
                    format!("  {}", choice.detail()),
                    Style::default().fg(theme.muted),
                ),
            ]))
        })
        .collect();
    super::draw_choice_list(
        f,
        chunks[2],
        " uncommitted changes detected — what do you want to do? ",
        choices,
        selected,
        theme,
    );
}

fn draw_progress(
    f: &mut Frame,
    area: Rect,
    start: &StartState,
    state: &AppState,
    theme: &Theme,
    spinner_start: &Instant,
) {
    let (title_area, status_area, body_area, log_area) = super::split_screen(area);

    super::draw_title(f, title_area, TITLE, theme);

    let status = if state.error.is_some() {
        super::done_status("Branch start failed.", false, theme)
    } else if state.done {
        super::done_status(
            &format!("Branch {} created and checked out.", start.branch_label()),
            true,
            theme,
        )
    } else {
        match &start.phase {
            StartPhase::CheckingTree => {
                super::running_status(spinner_start, "Checking the working tree...", theme)
            }
            StartPhase::Preparing(DirtyChoice::Stash) => {
                super::running_status(spinner_start, "Stashing changes...", theme)
            }
            StartPhase::Preparing(DirtyChoice::CommitAll) => {
                super::running_status(spinner_start, "Committing changes...", theme)
            }
            StartPhase::Preparing(DirtyChoice::Discard) => {
                super::running_status(spinner_start, "Discarding changes...", theme)
            }
            _ => super::running_status(spinner_start, "Running git commands...", theme),
        }
    };
    super::draw_status(f, status_area, status);

    if !state.done && state.error.is_none() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("creating {}", start.branch_label()),
                Style::default().fg(theme.muted),
            )),
            body_area,
        );
    }

    super::draw_log_panel(f, log_area, &state.log, theme);
}
