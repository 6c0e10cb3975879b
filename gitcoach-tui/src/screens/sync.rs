use crate::theme::Theme;
use gitcoach_core::state::{AppState, SyncPhase, Workflow};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::Instant;

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let Workflow::Sync(sync) = &state.workflow else {
        return;
    };
    let (title_area, status_area, body_area, log_area) = super::split_screen(area);

    super::draw_title(f, title_area, "gitcoach — sync with main", theme);

    let status = if state.error.is_some() {
        super::done_status("Sync failed.", false, theme)
    } else if state.done {
        super::done_status("Sync complete.", true, theme)
    } else {
        match sync.phase {
            SyncPhase::Running => {
                super::running_status(spinner_start, "Running git fetch & rebase...", theme)
            }
            SyncPhase::Refreshing => {
                super::running_status(spinner_start, "Reading working tree status...", theme)
            }
        }
    };
    super::draw_status(f, status_area, status);

    if let Some(files) = &sync.files {
        if files.is_empty() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "Working tree clean.",
                    Style::default().fg(theme.success),
                )),
                body_area,
            );
        } else {
            let items: Vec<ListItem> = files
                .iter()
                .map(|entry| ListItem::new(super::status_entry_line(entry, theme)))
                .collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} changed path(s) ", files.len()))
                    .border_style(Style::default().fg(theme.border)),
            );
            f.render_widget(list, body_area);
        }
    }

    super::draw_log_panel(f, log_area, &state.log, theme);
}
