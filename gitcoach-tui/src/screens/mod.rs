use crate::theme::Theme;
use gitcoach_core::{constants::VISIBLE_LOG_LINES, git::StatusEntry, state::{AppState, LogBuffer, Workflow}};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::time::Instant;

pub mod clean;
pub mod start;
pub mod sync;
pub mod tutor;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Height of the scrolling output panel: the visible window plus borders.
const LOG_PANEL_HEIGHT: u16 = VISIBLE_LOG_LINES as u16 + 2;

pub fn draw(f: &mut Frame, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let (main_area, error_area) = if state.error.is_some() {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(f.area());
        (chunks[0], Some(chunks[1]))
    } else {
        (f.area(), None)
    };

    match &state.workflow {
        Workflow::Start(_) => start::draw(f, main_area, state, theme, spinner_start),
        Workflow::Sync(_) => sync::draw(f, main_area, state, theme, spinner_start),
        Workflow::Clean(_) => clean::draw(f, main_area, state, theme, spinner_start),
        Workflow::Tutor(_) => tutor::draw(f, main_area, state, theme, spinner_start),
    }

    if let Some(area) = error_area {
        draw_error_bar(f, area, state, theme);
    }
}

fn draw_error_bar(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    if let Some(error) = &state.error {
        let error_line = Paragraph::new(Span::styled(
            format!(" Error: {error}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(error_line, area);
    }
}

/// Standard screen frame: title, status line, workflow body, output panel.
pub(crate) fn split_screen(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(LOG_PANEL_HEIGHT),
    ])
    .split(area);
    (chunks[0], chunks[1], chunks[2], chunks[3])
}

pub(crate) fn draw_title(f: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    f.render_widget(
        Paragraph::new(Span::styled(
            text.to_string(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        area,
    );
}

pub(crate) fn draw_status(f: &mut Frame, area: Rect, line: Line) {
    f.render_widget(Paragraph::new(line), area);
}

pub(crate) fn spinner_span(start: &Instant, theme: &Theme) -> Span<'static> {
    let elapsed = start.elapsed().as_millis() as usize;
    let frame = SPINNER_FRAMES[(elapsed / 80) % SPINNER_FRAMES.len()];
    Span::styled(
        format!("{frame} "),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )
}

pub(crate) fn running_status(start: &Instant, text: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![spinner_span(start, theme), Span::raw(text.to_string())])
}

/// Terminal status line with the quit hint attached.
pub(crate) fn done_status(text: &str, ok: bool, theme: &Theme) -> Line<'static> {
    let color = if ok { theme.success } else { theme.error };
    Line::from(vec![
        Span::styled(text.to_string(), Style::default().fg(color)),
        Span::styled("  (q to quit)", Style::default().fg(theme.muted)),
    ])
}

pub(crate) fn draw_log_panel(f: &mut Frame, area: Rect, log: &LogBuffer, theme: &Theme) {
    let lines: Vec<Line> = log.tail().iter().map(|l| Line::raw(l.as_str())).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" output ")
        .border_style(Style::default().fg(theme.border));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// One porcelain entry rendered as `XY path`, rename origin included.
pub(crate) fn status_entry_line<'a>(entry: &'a StatusEntry, theme: &Theme) -> Line<'a> {
    let code_color = match entry.index_status {
        'A' => theme.success,
        'M' | 'R' => theme.warning,
        'D' => theme.error,
        '?' => theme.muted,
        _ => theme.accent,
    };
    let mut spans = vec![Span::styled(
        format!("{}{} ", entry.index_status, entry.worktree_status),
        Style::default().fg(code_color),
    )];
    if let Some(orig) = &entry.orig_path {
        spans.push(Span::styled(
            format!("{orig} -> "),
            Style::default().fg(theme.muted),
        ));
    }
    spans.push(Span::raw(entry.path.as_str()));
    Line::from(spans)
}

pub(crate) fn draw_choice_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
    theme: &Theme,
) {
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(theme.accent)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut list_state);
}
