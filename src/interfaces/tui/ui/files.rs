use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Paragraph, Row, Table, TableState},
};

use super::common::{empty_hint, panel, region_placeholder};
use super::widgets::{StatusIndicator, render_form};
use crate::app::{Application, Focus};
use crate::features::FileField;
use crate::interfaces::tui::constants::colors;
use crate::utils::formatting::{file_icon, format_date, format_file_size, format_short_code};

pub fn draw_files_table(frame: &mut Frame, app: &Application, area: Rect) {
    let files = app.files.files();
    let title = format!("📁 Files ({})", app.files.count_text());

    if let Some(placeholder) = region_placeholder(
        files.state(),
        files.visible_len(),
        &title,
        &empty_hint(app, "file"),
    ) {
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec!["Name", "Code", "Size", "Downloads", "Created", "Status"])
        .style(
            Style::default()
                .fg(colors::WARNING)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = files
        .visible()
        .into_iter()
        .map(|file| {
            let indicator = StatusIndicator::new(!file.is_public, file.expires_at);
            Row::new(vec![
                Span::raw(format!(
                    "{} {}",
                    file_icon(&file.mime_type),
                    file.display_name()
                )),
                Span::styled(
                    format_short_code(&file.short_codes).to_string(),
                    Style::default().fg(colors::PRIMARY).bold(),
                ),
                Span::raw(format_file_size(file.file_size.max(0) as u64)),
                Span::styled(
                    file.downloads.to_string(),
                    Style::default().fg(colors::SUCCESS),
                ),
                Span::raw(format_date(file.created_at)),
                Span::styled(indicator.text(), indicator.style()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(panel(title, app.focus == Focus::List))
    .row_highlight_style(
        Style::default()
            .bg(colors::HIGHLIGHT_BG)
            .fg(colors::HIGHLIGHT_FG),
    )
    .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(files.selected_index()));
    frame.render_stateful_widget(table, area, &mut state);
}

pub fn draw_upload_form(frame: &mut Frame, app: &Application, area: Rect) {
    let block = panel("📤 Upload File".to_string(), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(inner);

    render_form(frame, &app.files.form, &[FileField::FilePath], chunks[0]);

    let limit = Paragraph::new(format!(
        "Max file size: {}MB",
        app.files.max_upload_mb()
    ))
    .style(Style::default().fg(colors::MUTED));
    frame.render_widget(limit, chunks[1]);
}
