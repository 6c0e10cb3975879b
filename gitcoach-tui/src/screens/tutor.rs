use crate::theme::Theme;
use gitcoach_core::state::{AppState, Workflow};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::time::Instant;

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let Workflow::Tutor(tutor) = &state.workflow else {
        return;
    };
    let step = &tutor.steps[tutor.current];

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(super::LOG_PANEL_HEIGHT),
    ])
    .split(area);

    super::draw_title(f, chunks[0], "gitcoach — guided tour", theme);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Step {}/{}", tutor.current + 1, tutor.steps.len()),
            Style::default().fg(theme.muted),
        )),
        chunks[1],
    );

    let mut card_lines = vec![
        Line::raw(step.description),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Command: ", Style::default().fg(theme.muted)),
            Span::styled(
                step.command,
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if step.completed {
        card_lines.push(Line::raw(""));
        card_lines.push(Line::from(Span::styled(
            "✓ completed",
            Style::default().fg(theme.success),
        )));
    }
    let card = Paragraph::new(card_lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", step.title))
                .border_style(Style::default().fg(theme.accent)),
        );
    f.render_widget(card, chunks[2]);

    let hint = if tutor.running.is_some() {
        Line::from(vec![
            super::spinner_span(spinner_start, theme),
            Span::styled(
                "running... · q quit",
                Style::default().fg(theme.muted),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "n next · p previous · r run · c complete · q quit",
            Style::default().fg(theme.muted),
        ))
    };
    f.render_widget(Paragraph::new(hint), chunks[3]);

    super::draw_log_panel(f, chunks[4], &state.log, theme);
}
