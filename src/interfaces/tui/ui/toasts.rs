//! 右上角通知

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::HitAreas;
use crate::app::Application;
use crate::interfaces::tui::constants::{MAX_VISIBLE_TOASTS, TOAST_WIDTH, colors};
use crate::ui::Severity;

const TOAST_HEIGHT: u16 = 3;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => colors::SUCCESS,
        Severity::Error => colors::ERROR,
        Severity::Warning => colors::WARNING,
        Severity::Info => colors::INFO,
    }
}

/// 最新消息在前，从右上角向下堆叠
pub fn draw_toasts(frame: &mut Frame, app: &Application, area: Rect, hit: &mut HitAreas) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut y = area.y + 1;

    for message in app
        .ui
        .messages
        .messages()
        .iter()
        .rev()
        .take(MAX_VISIBLE_TOASTS)
    {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = if message.is_leaving() {
            colors::MUTED
        } else {
            severity_color(message.severity)
        };
        let icon = if message.loading {
            "⏳"
        } else {
            message.severity.icon()
        };

        frame.render_widget(Clear, rect);
        let toast = Paragraph::new(Line::from(vec![
            Span::raw(format!("{} ", icon)),
            Span::styled(message.text.clone(), Style::default().fg(Color::White)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(toast, rect);

        hit.toasts.push((rect, message.id));
        y += TOAST_HEIGHT;
    }
}
