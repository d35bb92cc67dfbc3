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
use crate::features::TokenField;
use crate::interfaces::tui::constants::colors;
use crate::utils::formatting::format_date;

pub fn draw_tokens_table(frame: &mut Frame, app: &Application, area: Rect) {
    let tokens = app.tokens.tokens();
    let title = format!("🔑 API Tokens ({})", app.tokens.count_text());

    if let Some(placeholder) = region_placeholder(
        tokens.state(),
        tokens.visible_len(),
        &title,
        &empty_hint(app, "token"),
    ) {
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec!["Name", "Created", "Last Used", "Expires", "Status"])
        .style(
            Style::default()
                .fg(colors::WARNING)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = tokens
        .visible()
        .into_iter()
        .map(|token| {
            let indicator = StatusIndicator::new(false, token.expires_at);
            Row::new(vec![
                Span::styled(
                    token.name.clone().unwrap_or_else(|| "Unnamed".to_string()),
                    Style::default().fg(colors::PRIMARY).bold(),
                ),
                Span::raw(format_date(token.created_at)),
                Span::raw(
                    token
                        .last_used_at
                        .map(format_date)
                        .unwrap_or_else(|| "Never".to_string()),
                ),
                Span::raw(
                    token
                        .expires_at
                        .map(format_date)
                        .unwrap_or_else(|| "Never".to_string()),
                ),
                Span::styled(indicator.text(), indicator.style()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(12),
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

    let mut state = TableState::default().with_selected(Some(tokens.selected_index()));
    frame.render_stateful_widget(table, area, &mut state);
}

pub fn draw_token_form(frame: &mut Frame, app: &Application, area: Rect) {
    let block = panel("🔐 Create API Token".to_string(), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_form(frame, &app.tokens.form, &[TokenField::Name], inner);
}
