use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Row, Table, TableState},
};

use super::common::{empty_hint, panel, region_placeholder};
use super::widgets::{StatusIndicator, render_form};
use crate::app::{Application, Focus};
use crate::features::LinkField;
use crate::interfaces::tui::constants::{URL_TRUNCATE_LENGTH, colors};
use crate::utils::formatting::{format_date, format_short_code, truncate_url};

pub fn draw_links_table(frame: &mut Frame, app: &Application, area: Rect) {
    let links = app.links.links();
    let title = format!("🔗 Links ({})", app.links.count_text());

    if let Some(placeholder) = region_placeholder(
        links.state(),
        links.visible_len(),
        &title,
        &empty_hint(app, "link"),
    ) {
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec!["Code", "Target", "Clicks", "Created", "Status"])
        .style(
            Style::default()
                .fg(colors::WARNING)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = links
        .visible()
        .into_iter()
        .map(|link| {
            let indicator = StatusIndicator::new(false, link.expires_at);
            let extra = link.short_codes.len().saturating_sub(1);
            let code = if extra > 0 {
                format!("{} +{}", format_short_code(&link.short_codes), extra)
            } else {
                format_short_code(&link.short_codes).to_string()
            };
            Row::new(vec![
                Span::styled(code, Style::default().fg(colors::PRIMARY).bold()),
                Span::styled(
                    truncate_url(&link.original_url, URL_TRUNCATE_LENGTH),
                    Style::default().fg(colors::INFO),
                ),
                Span::styled(link.clicks.to_string(), Style::default().fg(colors::SUCCESS)),
                Span::raw(format_date(link.created_at)),
                Span::styled(indicator.text(), indicator.style()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
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

    let mut state = TableState::default().with_selected(Some(links.selected_index()));
    frame.render_stateful_widget(table, area, &mut state);
}

pub fn draw_link_form(frame: &mut Frame, app: &Application, area: Rect) {
    let block = panel("✨ Create Short Link".to_string(), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_form(frame, &app.links.form, &[LinkField::OriginalUrl], inner);
}
