use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
};

use super::common::{panel, region_placeholder};
use crate::app::Application;
use crate::features::analytics::{file_rows, overview_lines};
use crate::interfaces::tui::constants::{URL_TRUNCATE_LENGTH, colors};
use crate::utils::formatting::truncate_url;

pub fn draw_analytics(frame: &mut Frame, app: &Application, area: Rect) {
    let title = "📊 Analytics".to_string();
    let Some(overview) = app.analytics.overview() else {
        if let Some(placeholder) =
            region_placeholder(app.analytics.state(), 0, &title, "No analytics yet")
        {
            frame.render_widget(placeholder, area);
        }
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(area);

    // 汇总
    let summary: Vec<Line> = overview_lines(overview)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", label), Style::default().fg(colors::MUTED)),
                Span::styled(value, Style::default().fg(colors::PRIMARY).bold()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(summary).block(panel(title, true)),
        chunks[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let header_style = Style::default()
        .fg(colors::WARNING)
        .add_modifier(Modifier::BOLD);

    let top_links: Vec<Row> = overview
        .user
        .top_links
        .iter()
        .map(|link| {
            Row::new(vec![
                Span::styled(link.short_code.clone(), Style::default().fg(colors::PRIMARY)),
                Span::raw(truncate_url(&link.original_url, URL_TRUNCATE_LENGTH)),
                Span::styled(
                    link.total_clicks.to_string(),
                    Style::default().fg(colors::SUCCESS),
                ),
            ])
        })
        .collect();
    let links_table = Table::new(
        top_links,
        [
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["Code", "Target", "Clicks"]).style(header_style))
    .block(panel("🔥 Top Links".to_string(), false));
    frame.render_widget(links_table, right[0]);

    let files: Vec<Row> = file_rows(&overview.files).into_iter().map(Row::new).collect();
    let files_table = Table::new(
        files,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["File", "Size", "Downloads", "Recent"]).style(header_style))
    .block(panel("📁 File Downloads".to_string(), false));
    frame.render_widget(files_table, right[1]);
}
